use std::hint::black_box;
use std::time::{Duration, Instant};

use bench::{Distribution, apply_runtime_for_elements, default_rng, record_dataset};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use strided_sort::{AxisOrder, ReusePool, SortContext, View, sort_with_ctx};

const ROW_COUNTS: [usize; 3] = [1024, 16384, 131072];
const RECORD_WIDTHS: [usize; 3] = [1, 4, 16];

#[derive(Clone, Copy)]
enum Layout {
    Contiguous,
    Reversed,
    Transposed,
}

impl Layout {
    const ALL: [Self; 3] = [Self::Contiguous, Self::Reversed, Self::Transposed];

    fn label(self) -> &'static str {
        match self {
            Self::Contiguous => "contiguous",
            Self::Reversed => "reversed",
            Self::Transposed => "transposed",
        }
    }

    /// Rearrange a row-major dataset into this layout's buffer order.
    fn arrange(self, rows: usize, cols: usize, data: &[u64]) -> Vec<u64> {
        match self {
            Self::Contiguous | Self::Reversed => data.to_vec(),
            Self::Transposed => {
                let mut out = vec![0; data.len()];
                for row in 0..rows {
                    for col in 0..cols {
                        out[col * rows + row] = data[row * cols + col];
                    }
                }
                out
            }
        }
    }

    fn view<'a>(self, rows: usize, cols: usize, data: &'a mut [u64]) -> View<'a, u64> {
        let view = match self {
            Self::Contiguous => View::contiguous(data, vec![rows, cols]),
            Self::Reversed => {
                View::contiguous(data, vec![rows, cols]).and_then(|view| view.reverse_axis(0))
            }
            Self::Transposed => {
                View::contiguous(data, vec![cols, rows]).and_then(|view| view.permute_axes(&[1, 0]))
            }
        };
        view.unwrap()
    }
}

fn bench_layouts(c: &mut Criterion) {
    let mut rng = default_rng();
    for dist in Distribution::ALL {
        for &cols in &RECORD_WIDTHS {
            let mut group = c.benchmark_group(format!("strided_sort/{}/width_{cols}", dist.label()));

            for &rows in &ROW_COUNTS {
                apply_runtime_for_elements(&mut group, rows * cols);
                let base = record_dataset(&mut rng, rows, cols, dist);

                for layout in Layout::ALL {
                    let arranged = layout.arrange(rows, cols, &base);
                    group.bench_function(BenchmarkId::new(layout.label(), rows), |bencher| {
                        bencher.iter_custom(|iters| {
                            let mut total = Duration::ZERO;
                            let ctx = SortContext::new(ReusePool::new());
                            let order = AxisOrder::natural(2);
                            for _ in 0..iters {
                                let mut data = arranged.clone();
                                let start = Instant::now();
                                let mut view = layout.view(rows, cols, &mut data);
                                sort_with_ctx(&mut view, &order, &ctx, u64::cmp);
                                total += start.elapsed();
                                drop(view);
                                black_box(&data);
                            }
                            total
                        });
                    });
                }

                group.bench_function(BenchmarkId::new("copy_sort_copy", rows), |bencher| {
                    bencher.iter_custom(|iters| {
                        let mut total = Duration::ZERO;
                        for _ in 0..iters {
                            let mut data = base.clone();
                            let start = Instant::now();
                            let mut rows_vec: Vec<Vec<u64>> =
                                data.chunks_exact(cols).map(<[u64]>::to_vec).collect();
                            rows_vec.sort_unstable();
                            for (dst, src) in data.chunks_exact_mut(cols).zip(&rows_vec) {
                                dst.copy_from_slice(src);
                            }
                            total += start.elapsed();
                            black_box(&data);
                        }
                        total
                    });
                });
            }

            group.finish();
        }
    }
}

criterion_group!(benches, bench_layouts);
criterion_main!(benches);
