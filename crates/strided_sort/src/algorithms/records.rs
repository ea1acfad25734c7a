use std::cmp::Ordering;
use std::marker::PhantomData;
use std::ops::ControlFlow;
use std::ptr;

use crate::axis_order::AxisOrder;
use crate::pool::{BufferPool, ScratchBuffer};
use crate::view::View;

use super::walk::RecordWalk;

/// Record-level primitives the sorting routines are written against.
///
/// Records are addressed by their position on the sort axis. A `Slot` holds a
/// copy of one record outside the view (a pivot, or the record being inserted).
pub(crate) trait Records {
    type Slot;

    fn compare(&mut self, a: usize, b: usize) -> Ordering;
    /// Order of record `a` relative to the record held in `slot`.
    fn compare_slot(&mut self, a: usize, slot: &Self::Slot) -> Ordering;
    fn slots_equal(&mut self, x: &Self::Slot, y: &Self::Slot) -> bool;

    fn take_slot(&mut self, src: usize) -> Self::Slot;
    fn reload(&mut self, slot: &mut Self::Slot, src: usize);
    fn store(&mut self, dst: usize, slot: &Self::Slot);

    fn copy(&mut self, dst: usize, src: usize);
    fn swap(&mut self, a: usize, b: usize);
    /// `a <- b`, `b <- c`, `c <- a`.
    fn rotate(&mut self, a: usize, b: usize, c: usize);
    /// Simultaneous `dst[n] <- src[n]` for three records.
    fn move3(&mut self, dst: [usize; 3], src: [usize; 3]);
}

/// Records holding a single element: rank-1 views, or every record extent 1.
pub(crate) struct ScalarRecords<'a, T, F> {
    base: *mut T,
    offset: isize,
    stride: isize,
    len: usize,
    compare: F,
    _data: PhantomData<&'a mut [T]>,
}

impl<'a, T, F> ScalarRecords<'a, T, F>
where
    T: Copy,
    F: FnMut(&T, &T) -> Ordering,
{
    pub(crate) fn new(view: &'a mut View<'_, T>, compare: F) -> Self {
        Self {
            base: view.as_mut_ptr(),
            offset: view.offset(),
            stride: view.stride()[0],
            len: view.len(),
            compare,
            _data: PhantomData,
        }
    }

    #[inline(always)]
    fn at(&self, i: usize) -> *mut T {
        debug_assert!(i < self.len);
        // SAFETY: the view checked that every position on the sort axis maps
        // inside the buffer, and callers only pass positions below `len`.
        unsafe { self.base.offset(self.offset + i as isize * self.stride) }
    }

    #[inline(always)]
    fn read(&self, i: usize) -> T {
        unsafe { *self.at(i) }
    }
}

impl<T, F> Records for ScalarRecords<'_, T, F>
where
    T: Copy,
    F: FnMut(&T, &T) -> Ordering,
{
    type Slot = T;

    #[inline]
    fn compare(&mut self, a: usize, b: usize) -> Ordering {
        let (x, y) = (self.read(a), self.read(b));
        (self.compare)(&x, &y)
    }

    #[inline]
    fn compare_slot(&mut self, a: usize, slot: &T) -> Ordering {
        let x = self.read(a);
        (self.compare)(&x, slot)
    }

    #[inline]
    fn slots_equal(&mut self, x: &T, y: &T) -> bool {
        (self.compare)(x, y).is_eq()
    }

    #[inline]
    fn take_slot(&mut self, src: usize) -> T {
        self.read(src)
    }

    #[inline]
    fn reload(&mut self, slot: &mut T, src: usize) {
        *slot = self.read(src);
    }

    #[inline]
    fn store(&mut self, dst: usize, slot: &T) {
        unsafe { *self.at(dst) = *slot }
    }

    #[inline]
    fn copy(&mut self, dst: usize, src: usize) {
        unsafe { *self.at(dst) = *self.at(src) }
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        unsafe { ptr::swap(self.at(a), self.at(b)) }
    }

    #[inline]
    fn rotate(&mut self, a: usize, b: usize, c: usize) {
        let (pa, pb, pc) = (self.at(a), self.at(b), self.at(c));
        unsafe {
            let tmp = *pa;
            *pa = *pb;
            *pb = *pc;
            *pc = tmp;
        }
    }

    #[inline]
    fn move3(&mut self, dst: [usize; 3], src: [usize; 3]) {
        let values = src.map(|i| self.read(i));
        for (i, value) in dst.into_iter().zip(values) {
            unsafe { *self.at(i) = value }
        }
    }
}

/// Records spanning one or more record axes, walked with a [`RecordWalk`].
pub(crate) struct StridedRecords<'a, 'p, T, P: ?Sized, F> {
    base: *mut T,
    offset: isize,
    stride: isize,
    len: usize,
    walk: RecordWalk,
    pool: &'p P,
    compare: F,
    _data: PhantomData<&'a mut [T]>,
}

impl<'a, 'p, T, P, F> StridedRecords<'a, 'p, T, P, F>
where
    T: Copy,
    P: BufferPool<T> + ?Sized,
    F: FnMut(&T, &T) -> Ordering,
{
    pub(crate) fn new(
        view: &'a mut View<'_, T>,
        order: &AxisOrder,
        pool: &'p P,
        compare: F,
    ) -> Self {
        Self {
            walk: RecordWalk::new(view.shape(), view.stride(), order),
            base: view.as_mut_ptr(),
            offset: view.offset(),
            stride: view.stride()[0],
            len: view.len(),
            pool,
            compare,
            _data: PhantomData,
        }
    }

    /// Address of the first element of record `i`.
    #[inline(always)]
    fn origin(&self, i: usize) -> isize {
        debug_assert!(i < self.len);
        self.offset + i as isize * self.stride
    }

    /// Copy record `src` to the end of `buffer`.
    #[inline]
    fn fill(&self, buffer: &mut Vec<T>, src: usize) {
        let (base, at) = (self.base, self.origin(src));
        // SAFETY: record origin plus any walk position is an address the view
        // validated against the buffer length.
        self.walk
            .for_each(|pos| buffer.push(unsafe { *base.offset(at + pos) }));
    }
}

impl<'p, T, P, F> Records for StridedRecords<'_, 'p, T, P, F>
where
    T: Copy,
    P: BufferPool<T> + ?Sized,
    F: FnMut(&T, &T) -> Ordering,
{
    type Slot = ScratchBuffer<'p, T, P>;

    fn compare(&mut self, a: usize, b: usize) -> Ordering {
        let (base, pa, pb) = (self.base, self.origin(a), self.origin(b));
        let compare = &mut self.compare;
        let flow = self.walk.try_for_each(|pos| {
            let ord = unsafe { compare(&*base.offset(pa + pos), &*base.offset(pb + pos)) };
            if ord.is_ne() {
                ControlFlow::Break(ord)
            } else {
                ControlFlow::Continue(())
            }
        });
        match flow {
            ControlFlow::Break(ord) => ord,
            ControlFlow::Continue(()) => Ordering::Equal,
        }
    }

    fn compare_slot(&mut self, a: usize, slot: &Self::Slot) -> Ordering {
        let (base, pa) = (self.base, self.origin(a));
        let compare = &mut self.compare;
        let mut values = slot.iter();
        let flow = self.walk.try_for_each(|pos| {
            let Some(value) = values.next() else {
                return ControlFlow::Break(Ordering::Equal);
            };
            let ord = unsafe { compare(&*base.offset(pa + pos), value) };
            if ord.is_ne() {
                ControlFlow::Break(ord)
            } else {
                ControlFlow::Continue(())
            }
        });
        match flow {
            ControlFlow::Break(ord) => ord,
            ControlFlow::Continue(()) => Ordering::Equal,
        }
    }

    fn slots_equal(&mut self, x: &Self::Slot, y: &Self::Slot) -> bool {
        x.iter()
            .zip(y.iter())
            .all(|(a, b)| (self.compare)(a, b).is_eq())
    }

    fn take_slot(&mut self, src: usize) -> Self::Slot {
        let mut slot = ScratchBuffer::acquire(self.pool, self.walk.len());
        self.fill(&mut slot, src);
        slot
    }

    fn reload(&mut self, slot: &mut Self::Slot, src: usize) {
        slot.clear();
        self.fill(slot, src);
    }

    fn store(&mut self, dst: usize, slot: &Self::Slot) {
        let (base, at) = (self.base, self.origin(dst));
        let mut values = slot.iter();
        self.walk.for_each(|pos| {
            if let Some(&value) = values.next() {
                unsafe { *base.offset(at + pos) = value }
            }
        });
    }

    fn copy(&mut self, dst: usize, src: usize) {
        let (base, pd, ps) = (self.base, self.origin(dst), self.origin(src));
        self.walk
            .for_each(|pos| unsafe { *base.offset(pd + pos) = *base.offset(ps + pos) });
    }

    fn swap(&mut self, a: usize, b: usize) {
        let (base, pa, pb) = (self.base, self.origin(a), self.origin(b));
        self.walk
            .for_each(|pos| unsafe { ptr::swap(base.offset(pa + pos), base.offset(pb + pos)) });
    }

    fn rotate(&mut self, a: usize, b: usize, c: usize) {
        let base = self.base;
        let (pa, pb, pc) = (self.origin(a), self.origin(b), self.origin(c));
        self.walk.for_each(|pos| unsafe {
            let (xa, xb, xc) = (base.offset(pa + pos), base.offset(pb + pos), base.offset(pc + pos));
            let tmp = *xa;
            *xa = *xb;
            *xb = *xc;
            *xc = tmp;
        });
    }

    fn move3(&mut self, dst: [usize; 3], src: [usize; 3]) {
        let base = self.base;
        let dst = dst.map(|i| self.origin(i));
        let src = src.map(|i| self.origin(i));
        self.walk.for_each(|pos| unsafe {
            let values = src.map(|at| *base.offset(at + pos));
            for (at, value) in dst.into_iter().zip(values) {
                *base.offset(at + pos) = value;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::ReusePool;

    fn rows(view: &View<'_, i32>) -> Vec<Vec<i32>> {
        (0..view.len()).map(|i| view.record(i).unwrap()).collect()
    }

    #[test]
    fn strided_primitives_move_whole_records() {
        let mut data: Vec<i32> = (0..12).collect();
        let mut view = View::contiguous(&mut data, vec![4, 3]).unwrap();
        let pool = ReusePool::new();
        {
            let order = AxisOrder::natural(2);
            let mut records = StridedRecords::new(&mut view, &order, &pool, i32::cmp);
            assert_eq!(records.compare(0, 1), Ordering::Less);
            assert_eq!(records.compare(3, 3), Ordering::Equal);

            records.swap(0, 3);
            records.rotate(1, 2, 3);
            let pivot = records.take_slot(1);
            assert_eq!(pivot.as_slice(), &[6, 7, 8]);
            assert_eq!(records.compare_slot(2, &pivot), Ordering::Less);
            records.store(0, &pivot);
            records.copy(2, 1);
        }
        assert_eq!(pool.outstanding(), 0);
        assert_eq!(
            rows(&view),
            vec![vec![6, 7, 8], vec![6, 7, 8], vec![6, 7, 8], vec![3, 4, 5]]
        );
    }

    #[test]
    fn move3_is_simultaneous() {
        let mut data: Vec<i32> = (0..8).collect();
        let mut view = View::contiguous(&mut data, vec![4, 2]).unwrap();
        let pool = ReusePool::new();
        {
            let order = AxisOrder::natural(2);
            let mut records = StridedRecords::new(&mut view, &order, &pool, i32::cmp);
            records.move3([0, 1, 2], [1, 2, 0]);
        }
        assert_eq!(rows(&view), vec![vec![2, 3], vec![4, 5], vec![0, 1], vec![6, 7]]);

        let mut data = vec![10, 20, 30];
        let mut view = View::contiguous(&mut data, vec![3]).unwrap();
        {
            let mut records = ScalarRecords::new(&mut view, i32::cmp);
            records.move3([2, 0, 1], [0, 1, 2]);
        }
        drop(view);
        assert_eq!(data, vec![20, 30, 10]);
    }

    #[test]
    fn scalar_records_follow_reversed_stride() {
        let mut data = vec![1, 2, 3, 4];
        let mut view = View::contiguous(&mut data, vec![4])
            .unwrap()
            .reverse_axis(0)
            .unwrap();
        {
            let mut records = ScalarRecords::new(&mut view, i32::cmp);
            assert_eq!(records.compare(0, 3), Ordering::Greater);
            let slot = records.take_slot(0);
            records.copy(0, 3);
            records.store(3, &slot);
        }
        drop(view);
        assert_eq!(data, vec![4, 2, 3, 1]);
    }
}
