use std::ops::Range;

use crate::algorithms::walk::RecordWalk;
use crate::axis_order::AxisOrder;
use crate::error::{Error, Result};

/// Largest supported number of axes, sort axis included.
pub const MAX_RANK: usize = 32;

/// Strides of a dense row-major layout: the last axis is contiguous.
pub fn row_major_strides(shape: &[usize]) -> Vec<isize> {
    let mut strides = vec![0_isize; shape.len()];
    let mut acc = 1_isize;
    for (stride, &extent) in strides.iter_mut().zip(shape).rev() {
        *stride = acc;
        acc = acc.saturating_mul(extent.max(1) as isize);
    }
    strides
}

/// Mutable strided view over a flat buffer.
///
/// Axis 0 is the sort axis: each of its positions holds one record spanning
/// axes `1..rank`. The element at index `(i0, .., ik)` lives at address
/// `offset + Σ i_j * stride[j]`.
///
/// Construction checks that every reachable address lies inside `data`. The
/// metadata transforms (`reverse_axis`, `permute_axes`, `narrow`, `step_by`)
/// only ever shrink or reorder the reachable set, so they keep that property
/// without touching the data.
#[derive(Debug)]
pub struct View<'a, T> {
    data: &'a mut [T],
    shape: Vec<usize>,
    stride: Vec<isize>,
    offset: isize,
}

impl<'a, T> View<'a, T> {
    pub fn new(
        data: &'a mut [T],
        shape: Vec<usize>,
        stride: Vec<isize>,
        offset: isize,
    ) -> Result<Self> {
        check_layout(data.len(), &shape, &stride, offset)?;
        Ok(Self {
            data,
            shape,
            stride,
            offset,
        })
    }

    /// Dense row-major view starting at the front of `data`.
    pub fn contiguous(data: &'a mut [T], shape: Vec<usize>) -> Result<Self> {
        let needed = if shape.contains(&0) {
            0
        } else {
            shape
                .iter()
                .try_fold(1_usize, |acc, &extent| acc.checked_mul(extent))
                .ok_or(Error::OffsetOverflow)?
        };
        if needed > data.len() {
            return Err(Error::BufferTooShort {
                needed,
                len: data.len(),
            });
        }
        let stride = row_major_strides(&shape);
        Self::new(data, shape, stride, 0)
    }

    /// Number of records, i.e. the extent of the sort axis.
    #[inline]
    pub fn len(&self) -> usize {
        self.shape[0]
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn stride(&self) -> &[isize] {
        &self.stride
    }

    pub fn offset(&self) -> isize {
        self.offset
    }

    /// Number of elements in one record.
    pub fn record_len(&self) -> usize {
        let record = &self.shape[1..];
        if record.contains(&0) {
            return 0;
        }
        record.iter().fold(1, |acc, &extent| acc.saturating_mul(extent))
    }

    pub fn get(&self, index: &[usize]) -> Option<&T> {
        let address = self.address(index)?;
        self.data.get(address)
    }

    pub fn get_mut(&mut self, index: &[usize]) -> Option<&mut T> {
        let address = self.address(index)?;
        self.data.get_mut(address)
    }

    /// Elements of record `index`, record axes walked in natural row-major order.
    pub fn record(&self, index: usize) -> Option<Vec<T>>
    where
        T: Copy,
    {
        if index >= self.len() {
            return None;
        }
        let walk = RecordWalk::new(&self.shape, &self.stride, &AxisOrder::natural(self.rank()));
        let base = self.offset + index as isize * self.stride[0];
        let mut out = Vec::with_capacity(walk.len());
        walk.for_each(|pos| out.push(self.data[(base + pos) as usize]));
        Some(out)
    }

    /// Flip `axis` so that its last position becomes its first.
    pub fn reverse_axis(mut self, axis: usize) -> Result<Self> {
        self.check_axis(axis)?;
        let extent = self.shape[axis];
        if extent > 0 {
            let span = span_of(extent, self.stride[axis])?;
            self.offset = self.offset.checked_add(span).ok_or(Error::OffsetOverflow)?;
        }
        self.stride[axis] = -self.stride[axis];
        Ok(self)
    }

    /// Reorder axes: axis `k` of the result is axis `perm[k]` of `self`.
    pub fn permute_axes(mut self, perm: &[usize]) -> Result<Self> {
        let rank = self.rank();
        let mut seen = [false; MAX_RANK];
        if perm.len() != rank {
            return Err(Error::InvalidPermutation { rank });
        }
        for &axis in perm {
            if axis >= rank || seen[axis] {
                return Err(Error::InvalidPermutation { rank });
            }
            seen[axis] = true;
        }
        self.shape = perm.iter().map(|&axis| self.shape[axis]).collect();
        self.stride = perm.iter().map(|&axis| self.stride[axis]).collect();
        Ok(self)
    }

    /// Restrict `axis` to the positions in `range`.
    pub fn narrow(mut self, axis: usize, range: Range<usize>) -> Result<Self> {
        self.check_axis(axis)?;
        let extent = self.shape[axis];
        if range.start > range.end || range.end > extent {
            return Err(Error::RangeOutOfBounds {
                axis,
                start: range.start,
                end: range.end,
                extent,
            });
        }
        let shift = isize::try_from(range.start)
            .ok()
            .and_then(|start| start.checked_mul(self.stride[axis]))
            .and_then(|shift| self.offset.checked_add(shift))
            .ok_or(Error::OffsetOverflow)?;
        self.offset = shift;
        self.shape[axis] = range.end - range.start;
        Ok(self)
    }

    /// Keep every `step`-th position of `axis`, starting with the first.
    pub fn step_by(mut self, axis: usize, step: usize) -> Result<Self> {
        self.check_axis(axis)?;
        if step == 0 {
            return Err(Error::ZeroStep);
        }
        let extent = self.shape[axis];
        self.shape[axis] = extent.div_ceil(step);
        if self.shape[axis] > 1 {
            self.stride[axis] = isize::try_from(step)
                .ok()
                .and_then(|step| step.checked_mul(self.stride[axis]))
                .ok_or(Error::OffsetOverflow)?;
        }
        Ok(self)
    }

    #[inline]
    pub(crate) fn as_mut_ptr(&mut self) -> *mut T {
        self.data.as_mut_ptr()
    }

    fn check_axis(&self, axis: usize) -> Result<()> {
        if axis >= self.rank() {
            return Err(Error::InvalidAxis {
                axis,
                rank: self.rank(),
            });
        }
        Ok(())
    }

    fn address(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.rank() {
            return None;
        }
        let mut address = self.offset;
        for ((&i, &extent), &stride) in index.iter().zip(&self.shape).zip(&self.stride) {
            if i >= extent {
                return None;
            }
            address += i as isize * stride;
        }
        usize::try_from(address).ok()
    }
}

fn span_of(extent: usize, stride: isize) -> Result<isize> {
    isize::try_from(extent.saturating_sub(1))
        .ok()
        .and_then(|steps| steps.checked_mul(stride))
        .ok_or(Error::OffsetOverflow)
}

fn check_layout(len: usize, shape: &[usize], stride: &[isize], offset: isize) -> Result<()> {
    if shape.len() != stride.len() {
        return Err(Error::RankMismatch {
            shape: shape.len(),
            stride: stride.len(),
        });
    }
    if shape.is_empty() || shape.len() > MAX_RANK {
        return Err(Error::InvalidRank { rank: shape.len() });
    }
    for (axis, (&extent, &step)) in shape.iter().zip(stride).enumerate() {
        if extent > 1 && step == 0 {
            return Err(Error::ZeroStride { axis });
        }
    }
    if shape.contains(&0) {
        return Ok(());
    }

    let mut min = offset;
    let mut max = offset;
    for (&extent, &step) in shape.iter().zip(stride) {
        let span = span_of(extent, step)?;
        if span < 0 {
            min = min.checked_add(span).ok_or(Error::OffsetOverflow)?;
        } else {
            max = max.checked_add(span).ok_or(Error::OffsetOverflow)?;
        }
    }
    let in_bounds = min >= 0 && usize::try_from(max).is_ok_and(|max| max < len);
    if !in_bounds {
        return Err(Error::OutOfBounds { min, max, len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contiguous_uses_row_major_strides() {
        let mut data: Vec<u32> = (0..24).collect();
        let view = View::contiguous(&mut data, vec![2, 3, 4]).unwrap();
        assert_eq!(view.stride(), &[12, 4, 1]);
        assert_eq!(view.record_len(), 12);
        assert_eq!(view.get(&[1, 2, 3]), Some(&23));
        assert_eq!(view.get(&[1, 3, 0]), None);
    }

    #[test]
    fn rejects_inconsistent_descriptors() {
        let mut data = vec![0_i32; 8];
        assert_eq!(
            View::new(&mut data, vec![2, 4], vec![4], 0).unwrap_err(),
            Error::RankMismatch {
                shape: 2,
                stride: 1
            }
        );
        assert_eq!(
            View::new(&mut data, vec![], vec![], 0).unwrap_err(),
            Error::InvalidRank { rank: 0 }
        );
        assert_eq!(
            View::new(&mut data, vec![2, 4], vec![4, 0], 0).unwrap_err(),
            Error::ZeroStride { axis: 1 }
        );
        assert!(matches!(
            View::new(&mut data, vec![3, 4], vec![4, 1], 0).unwrap_err(),
            Error::OutOfBounds { max: 11, .. }
        ));
        assert!(matches!(
            View::new(&mut data, vec![2], vec![-1], 0).unwrap_err(),
            Error::OutOfBounds { min: -1, .. }
        ));
        assert_eq!(
            View::contiguous(&mut data, vec![3, 3]).unwrap_err(),
            Error::BufferTooShort { needed: 9, len: 8 }
        );
    }

    #[test]
    fn empty_views_skip_bounds() {
        let mut data: Vec<u8> = Vec::new();
        let view = View::new(&mut data, vec![0, 5], vec![5, 1], 100).unwrap();
        assert!(view.is_empty());
        assert_eq!(view.record(0), None);
    }

    #[test]
    fn empty_axis_keeps_record_len_from_overflowing() {
        let mut data: Vec<u8> = Vec::new();
        let shape = vec![3, usize::MAX / 2, usize::MAX / 2, 0];
        let view = View::new(&mut data, shape.clone(), vec![1, 1, 1, 1], 0).unwrap();
        assert_eq!(view.record_len(), 0);

        let view = View::contiguous(&mut data, shape).unwrap();
        assert_eq!(view.len(), 3);
        assert_eq!(view.record_len(), 0);
    }

    #[test]
    fn reverse_axis_maps_last_to_first() {
        let mut data: Vec<u16> = (0..6).collect();
        let view = View::contiguous(&mut data, vec![3, 2])
            .unwrap()
            .reverse_axis(0)
            .unwrap();
        assert_eq!(view.offset(), 4);
        assert_eq!(view.stride(), &[-2, 1]);
        assert_eq!(view.record(0), Some(vec![4, 5]));
        assert_eq!(view.record(2), Some(vec![0, 1]));
    }

    #[test]
    fn permute_narrow_and_step_compose() {
        let mut data: Vec<u32> = (0..20).collect();
        let view = View::contiguous(&mut data, vec![4, 5])
            .unwrap()
            .permute_axes(&[1, 0])
            .unwrap()
            .narrow(0, 1..5)
            .unwrap()
            .step_by(1, 2)
            .unwrap();
        assert_eq!(view.shape(), &[4, 2]);
        assert_eq!(view.stride(), &[1, 10]);
        assert_eq!(view.record(0), Some(vec![1, 11]));
        assert_eq!(view.record(3), Some(vec![4, 14]));
    }

    #[test]
    fn transforms_validate_arguments() {
        let mut data = vec![0_u8; 6];
        let view = View::contiguous(&mut data, vec![2, 3]).unwrap();
        assert_eq!(
            view.permute_axes(&[0, 0]).unwrap_err(),
            Error::InvalidPermutation { rank: 2 }
        );

        let view = View::contiguous(&mut data, vec![2, 3]).unwrap();
        assert_eq!(
            view.narrow(1, 2..4).unwrap_err(),
            Error::RangeOutOfBounds {
                axis: 1,
                start: 2,
                end: 4,
                extent: 3
            }
        );

        let view = View::contiguous(&mut data, vec![2, 3]).unwrap();
        assert_eq!(view.step_by(0, 0).unwrap_err(), Error::ZeroStep);

        let view = View::contiguous(&mut data, vec![2, 3]).unwrap();
        assert_eq!(
            view.reverse_axis(2).unwrap_err(),
            Error::InvalidAxis { axis: 2, rank: 2 }
        );
    }
}
