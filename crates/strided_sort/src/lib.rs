//! In-place sorting of strided multi-dimensional views along their first axis.
//!
//! Every position on axis 0 holds a record spanning the remaining axes;
//! records compare lexicographically, walking the record axes in a fixed
//! [`AxisOrder`]. Views may be sliced, transposed or reversed: the engine
//! follows shape, stride and offset directly and never copies the view into
//! contiguous storage.
//!
//! Short runs use insertion sort, longer ones a dual-pivot quicksort that
//! falls back to insertion sort below [`SortParams::insertion_threshold`]
//! and to heapsort when its recursion gets too deep. The sort is not stable.

mod algorithms;
mod axis_order;
mod element;
mod error;
mod pool;
mod view;

use std::cmp::Ordering;

use algorithms::dual_pivot_quick_sort::{MIN_QUICKSORT_LEN, sort_range};
use algorithms::records::{ScalarRecords, StridedRecords};

pub use axis_order::AxisOrder;
pub use element::Element;
pub use error::{Error, Result};
pub use pool::{BufferPool, HeapPool, ReusePool, ScratchBuffer};
pub use view::{MAX_RANK, View, row_major_strides};

/// Smallest accepted insertion threshold; longer ranges go to quicksort,
/// which needs room for five distinct samples strictly inside the range.
pub const MIN_INSERTION_THRESHOLD: usize = MIN_QUICKSORT_LEN - 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortParams {
    insertion_threshold: usize,
}

pub const TUNED_PARAMS: SortParams = SortParams {
    insertion_threshold: 32,
};

impl SortParams {
    pub fn new(insertion_threshold: usize) -> Result<Self> {
        if insertion_threshold < MIN_INSERTION_THRESHOLD {
            return Err(Error::ThresholdTooSmall {
                threshold: insertion_threshold,
                min: MIN_INSERTION_THRESHOLD,
            });
        }
        Ok(Self {
            insertion_threshold,
        })
    }

    /// Ranges of at most this many records are finished by insertion sort.
    pub fn insertion_threshold(&self) -> usize {
        self.insertion_threshold
    }
}

impl Default for SortParams {
    fn default() -> Self {
        TUNED_PARAMS
    }
}

/// Buffer pool and tuning parameters shared by sort calls.
#[derive(Clone, Debug, Default)]
pub struct SortContext<P> {
    pool: P,
    params: SortParams,
}

impl<P> SortContext<P> {
    pub fn new(pool: P) -> Self {
        Self {
            pool,
            params: TUNED_PARAMS,
        }
    }

    pub fn with_params(mut self, params: SortParams) -> Self {
        self.params = params;
        self
    }

    pub fn pool(&self) -> &P {
        &self.pool
    }

    pub fn params(&self) -> SortParams {
        self.params
    }
}

/// Sort `view` ascending along axis 0, records compared in natural axis order.
pub fn sort<T: Element>(view: &mut View<'_, T>) {
    sort_by(view, T::compare);
}

/// Like [`sort`], with a caller-supplied total order on elements.
pub fn sort_by<T, F>(view: &mut View<'_, T>, compare: F)
where
    T: Copy,
    F: FnMut(&T, &T) -> Ordering,
{
    let ctx = SortContext::new(ReusePool::new());
    let order = AxisOrder::natural(view.rank());
    sort_with_ctx(view, &order, &ctx, compare);
}

/// Sort with an explicit axis order, buffer pool and tuning parameters.
///
/// # Panics
///
/// Panics if `order` was built for a different rank than `view`.
pub fn sort_with_ctx<T, P, F>(
    view: &mut View<'_, T>,
    order: &AxisOrder,
    ctx: &SortContext<P>,
    compare: F,
) where
    T: Copy,
    P: BufferPool<T>,
    F: FnMut(&T, &T) -> Ordering,
{
    assert_eq!(
        order.rank(),
        view.rank(),
        "axis order rank does not match view rank"
    );

    let len = view.len();
    let record_len = view.record_len();
    let threshold = ctx.params.insertion_threshold;
    let _span = tracing::debug_span!(
        "strided_sort",
        len,
        rank = view.rank(),
        record_len,
        threshold
    )
    .entered();

    if record_len == 0 {
        tracing::trace!(path = "trivial", "records hold no elements");
        return;
    }

    if record_len == 1 {
        let mut records = ScalarRecords::new(view, compare);
        sort_range(&mut records, 0, len, threshold);
    } else {
        let mut records = StridedRecords::new(view, order, &ctx.pool, compare);
        sort_range(&mut records, 0, len, threshold);
    }
}
