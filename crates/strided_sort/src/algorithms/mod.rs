pub(crate) mod dual_pivot_quick_sort;
pub(crate) mod heap_sort;
pub(crate) mod insertion_sort;
pub(crate) mod records;
pub(crate) mod walk;
