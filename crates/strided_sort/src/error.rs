//! Error types for the `strided_sort` crate

/// Errors raised while describing a view, an axis order or tuning parameters.
///
/// Sorting itself never fails. Everything the engine relies on is checked
/// once, when the descriptor is built.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Shape and stride lists have different lengths.
    #[error("shape has {shape} axes but stride has {stride}")]
    RankMismatch { shape: usize, stride: usize },

    /// A view needs at least the sort axis, and at most `MAX_RANK` axes.
    #[error("unsupported rank {rank}")]
    InvalidRank { rank: usize },

    /// An axis with more than one position has a zero stride, so its
    /// positions would alias each other.
    #[error("axis {axis} has zero stride")]
    ZeroStride { axis: usize },

    /// Some reachable address falls outside the backing buffer.
    #[error("view addresses span [{min}, {max}] but the buffer holds {len} elements")]
    OutOfBounds { min: isize, max: isize, len: usize },

    /// Address arithmetic overflowed `isize`.
    #[error("offset overflow while computing view addresses")]
    OffsetOverflow,

    /// Axis index is not below the rank of the view.
    #[error("invalid axis {axis} for rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    /// Axis order is not a permutation of the record axes.
    #[error("axis order must be a permutation of the record axes 1..rank")]
    InvalidAxisOrder,

    /// Axis permutation does not name every axis exactly once.
    #[error("axis permutation must name each of the {rank} axes exactly once")]
    InvalidPermutation { rank: usize },

    /// A sub-range does not fit the extent of its axis.
    #[error("range {start}..{end} out of bounds for axis {axis} with extent {extent}")]
    RangeOutOfBounds {
        axis: usize,
        start: usize,
        end: usize,
        extent: usize,
    },

    /// Step of zero passed to `View::step_by`.
    #[error("step must be positive")]
    ZeroStep,

    /// Insertion threshold too small for the five-sample quicksort.
    #[error("insertion threshold {threshold} is below the minimum of {min}")]
    ThresholdTooSmall { threshold: usize, min: usize },

    /// Buffer too short for a contiguous view of the requested shape.
    #[error("contiguous view needs {needed} elements but the buffer holds {len}")]
    BufferTooShort { needed: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
