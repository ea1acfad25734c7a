use super::records::Records;

/// Heapsort of records `left..=right`, using only compare and swap.
///
/// Fallback for ranges where quicksort ran out of depth budget.
pub(crate) fn heap_sort<R: Records>(records: &mut R, left: usize, right: usize) {
    if right <= left {
        return;
    }
    let len = right - left + 1;

    let mut start = (len - 2) / 2;
    loop {
        sift_down(records, left, start, len);
        if start == 0 {
            break;
        }
        start -= 1;
    }

    let mut end = len - 1;
    while end > 0 {
        records.swap(left, left + end);
        sift_down(records, left, 0, end);
        end -= 1;
    }
}

/// Restore the max-heap property below `root` in the heap `base..base + end`.
#[inline]
fn sift_down<R: Records>(records: &mut R, base: usize, mut root: usize, end: usize) {
    loop {
        let child = root * 2 + 1;
        if child >= end {
            break;
        }

        let mut swap_idx = child;
        if child + 1 < end && records.compare(base + child, base + child + 1).is_lt() {
            swap_idx = child + 1;
        }

        if records.compare(base + root, base + swap_idx).is_ge() {
            break;
        }

        records.swap(base + root, base + swap_idx);
        root = swap_idx;
    }
}
