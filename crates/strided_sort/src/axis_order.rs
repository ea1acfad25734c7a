use std::cmp::Reverse;

use crate::error::{Error, Result};
use crate::view::{MAX_RANK, View};

/// Order in which the record axes `1..rank` are walked, outermost first.
///
/// The outermost axis is the most significant one when two records are
/// compared, and the same order lays out scratch buffers, so one order must be
/// used for every step of a sort.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AxisOrder {
    rank: usize,
    axes: Vec<usize>,
}

impl AxisOrder {
    /// Axes `1..rank` ascending: plain row-major lexicographic order.
    pub fn natural(rank: usize) -> Self {
        Self {
            rank,
            axes: (1..rank).collect(),
        }
    }

    pub fn new(rank: usize, axes: &[usize]) -> Result<Self> {
        if rank == 0 || rank > MAX_RANK {
            return Err(Error::InvalidRank { rank });
        }
        if axes.len() != rank - 1 {
            return Err(Error::InvalidAxisOrder);
        }
        let mut seen = [false; MAX_RANK];
        for &axis in axes {
            if axis == 0 || axis >= rank || seen[axis] {
                return Err(Error::InvalidAxisOrder);
            }
            seen[axis] = true;
        }
        Ok(Self {
            rank,
            axes: axes.to_vec(),
        })
    }

    /// Largest stride outermost, so the innermost loop makes the smallest jumps.
    ///
    /// This changes which axis is most significant in the key, so it only
    /// gives layout-independent results on views whose strides already
    /// decrease along the record axes.
    pub fn by_stride<T>(view: &View<'_, T>) -> Self {
        let stride = view.stride();
        let mut axes: Vec<usize> = (1..view.rank()).collect();
        axes.sort_by_key(|&axis| Reverse(stride[axis].unsigned_abs()));
        Self {
            rank: view.rank(),
            axes,
        }
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn axes(&self) -> &[usize] {
        &self.axes
    }
}
