use std::ops::ControlFlow;

use crate::axis_order::AxisOrder;
use crate::view::MAX_RANK;

/// Element positions of one record, relative to the record's base address.
///
/// Built once per sort call from shape, stride and axis order. Positions come
/// out depth-first in axis order with the outermost axis changing slowest, so
/// the n-th position visited is also the n-th slot of a scratch buffer.
#[derive(Clone, Debug)]
pub(crate) struct RecordWalk {
    depth: usize,
    len: usize,
    extents: [usize; MAX_RANK],
    steps: [isize; MAX_RANK],
    // Distance travelled by a full pass over a level, undone when it wraps.
    rewinds: [isize; MAX_RANK],
}

impl RecordWalk {
    pub(crate) fn new(shape: &[usize], stride: &[isize], order: &AxisOrder) -> Self {
        let mut walk = Self {
            depth: order.axes().len(),
            len: 1,
            extents: [0; MAX_RANK],
            steps: [0; MAX_RANK],
            rewinds: [0; MAX_RANK],
        };
        for (level, &axis) in order.axes().iter().enumerate() {
            let extent = shape[axis];
            walk.extents[level] = extent;
            walk.steps[level] = stride[axis];
            // Only read when no extent is zero; the view bounds keep it exact then.
            walk.rewinds[level] = stride[axis].wrapping_mul(extent.saturating_sub(1) as isize);
            walk.len = walk.len.saturating_mul(extent);
        }
        walk
    }

    /// Number of elements in a record.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn try_for_each<B>(
        &self,
        mut f: impl FnMut(isize) -> ControlFlow<B>,
    ) -> ControlFlow<B> {
        if self.len == 0 {
            return ControlFlow::Continue(());
        }
        match self.depth {
            0 => return f(0),
            1 => {
                let step = self.steps[0];
                let mut pos = 0_isize;
                for _ in 0..self.extents[0] {
                    f(pos)?;
                    pos += step;
                }
                return ControlFlow::Continue(());
            }
            _ => {}
        }

        let mut counters = [0_usize; MAX_RANK];
        let mut pos = 0_isize;
        loop {
            f(pos)?;
            let mut level = self.depth - 1;
            loop {
                counters[level] += 1;
                if counters[level] < self.extents[level] {
                    pos += self.steps[level];
                    break;
                }
                counters[level] = 0;
                pos -= self.rewinds[level];
                if level == 0 {
                    return ControlFlow::Continue(());
                }
                level -= 1;
            }
        }
    }

    #[inline]
    pub(crate) fn for_each(&self, mut f: impl FnMut(isize)) {
        let _ = self.try_for_each(|pos| {
            f(pos);
            ControlFlow::<()>::Continue(())
        });
    }
}
