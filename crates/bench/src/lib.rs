use std::time::Duration;

use criterion::measurement::Measurement;
use criterion::{BenchmarkGroup, SamplingMode};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const RNG_SEED: u64 = 0x5EED_2026;
const FEW_DISTINCT_KEYS: u64 = 8;

/// Criterion timing settings for one size class of sort inputs.
#[derive(Clone, Copy, Debug)]
pub struct RuntimePreset {
    /// Inputs up to this many elements use the preset.
    pub max_elements: usize,
    pub sample_size: usize,
    pub warm_up: Duration,
    pub measurement: Duration,
    pub sampling: SamplingMode,
}

/// Presets for record sorts, ordered by `max_elements`.
///
/// Every iteration clones the input, so large inputs get flat sampling and
/// longer windows to keep the clone out of the noise.
pub const RUNTIME_PRESETS: [RuntimePreset; 3] = [
    RuntimePreset {
        max_elements: 1 << 14,
        sample_size: 20,
        warm_up: Duration::from_millis(150),
        measurement: Duration::from_millis(300),
        sampling: SamplingMode::Auto,
    },
    RuntimePreset {
        max_elements: 1 << 18,
        sample_size: 12,
        warm_up: Duration::from_millis(300),
        measurement: Duration::from_millis(900),
        sampling: SamplingMode::Flat,
    },
    RuntimePreset {
        max_elements: usize::MAX,
        sample_size: 10,
        warm_up: Duration::from_millis(600),
        measurement: Duration::from_millis(2000),
        sampling: SamplingMode::Flat,
    },
];

impl RuntimePreset {
    /// Smallest preset whose size class covers `elements`.
    pub fn for_elements(elements: usize) -> Self {
        RUNTIME_PRESETS
            .iter()
            .copied()
            .find(|preset| elements <= preset.max_elements)
            .unwrap_or(RUNTIME_PRESETS[RUNTIME_PRESETS.len() - 1])
    }

    pub fn apply<M: Measurement>(&self, group: &mut BenchmarkGroup<'_, M>) {
        group.sample_size(self.sample_size);
        group.warm_up_time(self.warm_up);
        group.measurement_time(self.measurement);
        group.sampling_mode(self.sampling);
    }
}

/// Pick a runtime preset from the number of elements one iteration sorts.
pub fn apply_runtime_for_elements<M: Measurement>(
    group: &mut BenchmarkGroup<'_, M>,
    elements: usize,
) {
    RuntimePreset::for_elements(elements).apply(group);
}

pub fn default_rng() -> StdRng {
    StdRng::seed_from_u64(RNG_SEED)
}

#[derive(Clone, Copy, Debug)]
pub enum Distribution {
    RandomUniform,
    /// Keys drawn from a handful of values, so pivots collide often.
    FewDistinct,
    /// Ascending rows with 1% of them swapped at random.
    NearlySorted,
}

impl Distribution {
    pub const ALL: [Self; 3] = [Self::RandomUniform, Self::FewDistinct, Self::NearlySorted];

    pub fn label(self) -> &'static str {
        match self {
            Self::RandomUniform => "random_uniform",
            Self::FewDistinct => "few_distinct",
            Self::NearlySorted => "nearly_sorted",
        }
    }
}

/// Row-major `rows x cols` buffer whose rows follow `dist`.
pub fn record_dataset<R: Rng + ?Sized>(
    rng: &mut R,
    rows: usize,
    cols: usize,
    dist: Distribution,
) -> Vec<u64> {
    let mut data = Vec::with_capacity(rows * cols);
    match dist {
        Distribution::RandomUniform => {
            data.extend((0..rows * cols).map(|_| rng.random::<u64>()));
        }
        Distribution::FewDistinct => {
            data.extend((0..rows * cols).map(|_| rng.random_range(0..FEW_DISTINCT_KEYS)));
        }
        Distribution::NearlySorted => {
            for row in 0..rows {
                data.extend(std::iter::repeat_n(row as u64, cols));
            }
            let swaps = (rows / 100).max(1);
            for _ in 0..swaps {
                let a = rng.random_range(0..rows);
                let b = rng.random_range(0..rows);
                for col in 0..cols {
                    data.swap(a * cols + col, b * cols + col);
                }
            }
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datasets_have_requested_shape() {
        let mut rng = default_rng();
        for dist in Distribution::ALL {
            let data = record_dataset(&mut rng, 37, 3, dist);
            assert_eq!(data.len(), 111, "{}", dist.label());
        }
    }

    #[test]
    fn presets_cover_every_size() {
        assert_eq!(RuntimePreset::for_elements(0).sample_size, 20);
        assert_eq!(RuntimePreset::for_elements(1 << 14).sample_size, 20);
        assert_eq!(RuntimePreset::for_elements((1 << 14) + 1).sample_size, 12);
        assert_eq!(RuntimePreset::for_elements(usize::MAX).sample_size, 10);
    }

    #[test]
    fn nearly_sorted_rows_stay_whole() {
        let mut rng = default_rng();
        let data = record_dataset(&mut rng, 500, 4, Distribution::NearlySorted);
        for row in data.chunks(4) {
            assert!(row.iter().all(|&x| x == row[0]));
        }
    }
}
