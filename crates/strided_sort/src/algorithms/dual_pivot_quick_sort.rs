use std::cmp::Ordering;

use super::heap_sort::heap_sort;
use super::insertion_sort::insertion_sort;
use super::records::Records;

/// Shortest range the five-sample pivot selection handles: it needs five
/// distinct sample positions strictly inside `left..=right`.
pub(crate) const MIN_QUICKSORT_LEN: usize = 7;

/// Unrolled insertion sort on five samples: nine compare-exchanges.
const SAMPLE_NETWORK: [(usize, usize); 9] = [
    (0, 1),
    (3, 4),
    (0, 2),
    (1, 2),
    (0, 3),
    (2, 3),
    (1, 4),
    (1, 2),
    (3, 4),
];

/// Quicksort levels allowed per doubling of the range length before
/// falling back to heapsort.
const DEPTH_PER_LOG2: usize = 2;

/// Depth budget for a range of `len` records.
pub(crate) fn depth_limit(len: usize) -> usize {
    DEPTH_PER_LOG2 * len.max(1).ilog2() as usize + 1
}

/// Sort records `start..end`, finishing short ranges with insertion sort.
pub(crate) fn sort_range<R: Records>(records: &mut R, start: usize, end: usize, threshold: usize) {
    let len = end.saturating_sub(start);
    if len <= 1 {
        tracing::trace!(path = "trivial", "nothing to reorder");
    } else if len <= threshold {
        tracing::trace!(path = "insertion", "dispatching");
    } else {
        tracing::trace!(path = "quicksort", "dispatching");
    }
    sort_part(records, start, end, threshold, depth_limit(len));
}

fn sort_part<R: Records>(records: &mut R, start: usize, end: usize, threshold: usize, depth: usize) {
    let len = end.saturating_sub(start);
    if len <= 1 {
        return;
    }
    if len <= threshold {
        insertion_sort(records, start, end - 1);
    } else {
        dual_pivot_quick_sort(records, start, end - 1, threshold, depth);
    }
}

/// Dual-pivot quicksort of records `left..=right` after Yaroslavskiy.
///
/// Two pivots are taken from five evenly spread samples and held in slots
/// outside the view while `left + 1..=right - 1` is split into records below
/// the first pivot, between the pivots, and above the second. The two smaller
/// parts are sorted recursively and the largest by the next iteration, so
/// the stack stays logarithmic. Once `depth` levels are used up the range is
/// heapsorted.
pub(crate) fn dual_pivot_quick_sort<R: Records>(
    records: &mut R,
    mut left: usize,
    mut right: usize,
    threshold: usize,
    mut depth: usize,
) {
    loop {
        debug_assert!(right + 1 - left >= MIN_QUICKSORT_LEN);
        if depth == 0 {
            heap_sort(records, left, right);
            return;
        }
        depth -= 1;

        let sixth = (right - left + 1) / 6;
        let index1 = left + sixth;
        let index5 = right - sixth;
        let index3 = left + (right - left) / 2;
        let index2 = index3 - sixth;
        let index4 = index3 + sixth;

        let mut samples = [index1, index2, index3, index4, index5];
        for (a, b) in SAMPLE_NETWORK {
            if records.compare(samples[a], samples[b]).is_gt() {
                samples.swap(a, b);
            }
        }

        let pivot1 = records.take_slot(samples[1]);
        let pivot2 = records.take_slot(samples[3]);
        let pivots_equal = records.slots_equal(&pivot1, &pivot2);

        // The outer samples stay in the range; both pivot positions are
        // refilled from the two ends, which become free until the pivots
        // are stored back at the boundaries.
        records.move3([index1, index3, index5], [samples[0], samples[2], samples[4]]);
        records.copy(index2, left);
        records.copy(index4, right);

        let mut less = left + 1;
        let mut great = right - 1;
        if pivots_equal {
            partition_around(records, &pivot1, &mut less, &mut great);
        } else {
            partition_between(records, &pivot1, &pivot2, &mut less, &mut great);
        }

        records.copy(left, less - 1);
        records.store(less - 1, &pivot1);
        records.copy(right, great + 1);
        records.store(great + 1, &pivot2);

        let lower = (left, less - 1);
        let upper = (great + 2, right + 1);
        let middle = if pivots_equal {
            // Everything between the pivots equals them.
            (less, less)
        } else {
            // A middle zone this large is likely crowded with copies of the
            // pivots; pull them out before it is sorted.
            if less < index1 && great > index5 {
                while less <= great && records.compare_slot(less, &pivot1).is_eq() {
                    less += 1;
                }
                while great >= less && records.compare_slot(great, &pivot2).is_eq() {
                    great -= 1;
                }
                extract_pivot_copies(records, &pivot1, &pivot2, &mut less, &mut great);
            }
            (less, great + 1)
        };

        drop(pivot1);
        drop(pivot2);

        let mut parts = [lower, middle, upper];
        parts.sort_unstable_by_key(|&(start, end)| end.saturating_sub(start));
        let [smallest, medium, (start, end)] = parts;
        sort_part(records, smallest.0, smallest.1, threshold, depth);
        sort_part(records, medium.0, medium.1, threshold, depth);

        let len = end.saturating_sub(start);
        if len <= threshold {
            if len > 1 {
                insertion_sort(records, start, end - 1);
            }
            return;
        }
        left = start;
        right = end - 1;
    }
}

/// Two-way split around a single pivot value: smaller records go to the
/// front, larger ones to the back, equal ones stay in the middle.
fn partition_around<R: Records>(
    records: &mut R,
    pivot: &R::Slot,
    less: &mut usize,
    great: &mut usize,
) {
    let mut k = *less;
    while k <= *great {
        match records.compare_slot(k, pivot) {
            Ordering::Equal => {}
            Ordering::Less => {
                if k != *less {
                    records.swap(k, *less);
                }
                *less += 1;
            }
            Ordering::Greater => loop {
                let ord = records.compare_slot(*great, pivot);
                if ord.is_gt() {
                    *great -= 1;
                    if *great < k {
                        break;
                    }
                    continue;
                }
                if ord.is_lt() {
                    records.rotate(k, *less, *great);
                    *less += 1;
                } else {
                    records.swap(k, *great);
                }
                *great -= 1;
                break;
            },
        }
        k += 1;
    }
}

/// Three-way split: `< pivot1` to the front, `> pivot2` to the back.
fn partition_between<R: Records>(
    records: &mut R,
    pivot1: &R::Slot,
    pivot2: &R::Slot,
    less: &mut usize,
    great: &mut usize,
) {
    let mut k = *less;
    while k <= *great {
        if records.compare_slot(k, pivot1).is_lt() {
            if k != *less {
                records.swap(k, *less);
            }
            *less += 1;
        } else if records.compare_slot(k, pivot2).is_gt() {
            loop {
                if records.compare_slot(*great, pivot2).is_gt() {
                    *great -= 1;
                    if *great < k {
                        break;
                    }
                    continue;
                }
                if records.compare_slot(*great, pivot1).is_lt() {
                    records.rotate(k, *less, *great);
                    *less += 1;
                } else {
                    records.swap(k, *great);
                }
                *great -= 1;
                break;
            }
        }
        k += 1;
    }
}

/// Move records equal to `pivot1` to the front of `less..=great` and records
/// equal to `pivot2` to its back, leaving the strictly-between ones in place.
fn extract_pivot_copies<R: Records>(
    records: &mut R,
    pivot1: &R::Slot,
    pivot2: &R::Slot,
    less: &mut usize,
    great: &mut usize,
) {
    let mut k = *less;
    while k <= *great {
        if records.compare_slot(k, pivot1).is_eq() {
            if k != *less {
                records.swap(k, *less);
            }
            *less += 1;
        } else if records.compare_slot(k, pivot2).is_eq() {
            loop {
                if records.compare_slot(*great, pivot2).is_eq() {
                    *great -= 1;
                    if *great < k {
                        break;
                    }
                    continue;
                }
                if records.compare_slot(*great, pivot1).is_eq() {
                    records.rotate(k, *less, *great);
                    *less += 1;
                } else {
                    records.swap(k, *great);
                }
                *great -= 1;
                break;
            }
        }
        k += 1;
    }
}
