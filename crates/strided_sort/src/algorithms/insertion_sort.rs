use super::records::Records;

/// Sort records `left..=right` in place.
///
/// The record being inserted is held in one slot for the whole pass; larger
/// records shift one position right until a record not greater than it is
/// found, so ties never move.
pub(crate) fn insertion_sort<R: Records>(records: &mut R, left: usize, right: usize) {
    if right <= left {
        return;
    }

    let mut key = records.take_slot(left);
    for i in (left + 1)..=right {
        records.reload(&mut key, i);
        let mut j = i;
        while j > left && records.compare_slot(j - 1, &key).is_gt() {
            records.copy(j, j - 1);
            j -= 1;
        }
        if j != i {
            records.store(j, &key);
        }
    }
}
