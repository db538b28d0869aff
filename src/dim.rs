//! Per-dimension addressing descriptors and selection arguments.

use std::ops::RangeFull;

use crate::{MatrixError, Result};

/// How one dimension of a [`View`](crate::View) maps a coordinate to its share of the
/// linear offset.
///
/// The linear offset of a coordinate tuple is the sum of the per-dimension shares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dim {
    /// Coordinate `k` contributes `first + k * step`, for `k in 0..size`.
    Affine {
        first: isize,
        step: isize,
        size: usize,
    },
    /// Coordinate `k` contributes `indices[k]`.
    Indexed(Vec<isize>),
}

impl Dim {
    /// Number of coordinates along this dimension.
    #[inline]
    pub fn size(&self) -> usize {
        match self {
            Dim::Affine { size, .. } => *size,
            Dim::Indexed(indices) => indices.len(),
        }
    }

    #[inline]
    pub fn is_indexed(&self) -> bool {
        matches!(self, Dim::Indexed(_))
    }

    /// Offset contributed by coordinate `k` (not bounds checked).
    #[inline]
    pub fn offset(&self, k: usize) -> isize {
        match self {
            Dim::Affine { first, step, .. } => first + k as isize * step,
            Dim::Indexed(indices) => indices[k],
        }
    }

    /// Offset contributed by the last coordinate.
    #[inline]
    pub fn last(&self) -> isize {
        self.offset(self.size() - 1)
    }

    /// Materialize the per-coordinate offsets.
    pub fn to_indices(&self) -> Vec<isize> {
        match self {
            Dim::Affine { first, step, size } => {
                (0..*size).map(|k| first + k as isize * step).collect()
            }
            Dim::Indexed(indices) => indices.clone(),
        }
    }

    /// Consecutive deltas between offsets, terminated by `-(last + 1)`.
    ///
    /// Summing the first offset with every entry lands on `-1`, which the indexed
    /// cursor uses as its end marker relative to its base offset.
    pub fn steps(&self) -> Vec<isize> {
        let indices = self.to_indices();
        let mut steps = Vec::with_capacity(indices.len());
        for w in indices.windows(2) {
            steps.push(w[1] - w[0]);
        }
        steps.push(-(indices[indices.len() - 1] + 1));
        steps
    }

    /// Shift every offset of this dimension by `delta`.
    pub(crate) fn add_offset(&mut self, delta: isize) {
        match self {
            Dim::Affine { first, .. } => *first += delta,
            Dim::Indexed(indices) => indices.iter_mut().for_each(|i| *i += delta),
        }
    }

    /// Restrict this dimension to positions `start, start + factor, ...` (`count` of them).
    ///
    /// Positions are relative to the current coordinates, so for indexed dimensions the
    /// existing index list is re-sliced rather than raw offsets being taken.
    pub(crate) fn restrict(&self, start: usize, factor: isize, count: usize) -> Dim {
        match self {
            Dim::Affine { first, step, .. } => Dim::Affine {
                first: first + start as isize * step,
                step: step * factor,
                size: count,
            },
            Dim::Indexed(indices) => Dim::Indexed(
                (0..count)
                    .map(|k| indices[(start as isize + k as isize * factor) as usize])
                    .collect(),
            ),
        }
    }

    /// Compose logical positions with this dimension's mapping.
    pub(crate) fn compose(&self, positions: &[usize]) -> Dim {
        Dim::Indexed(positions.iter().map(|&k| self.offset(k)).collect())
    }
}

/// One selection argument, applied to a single dimension.
///
/// Positions may be negative to count from the end (`-1` is the last coordinate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Keep the whole dimension.
    All,
    /// Keep one coordinate.
    Index(isize),
    /// `start..=end`, walking backwards when `start > end`.
    Range(isize, isize),
    /// `start, start + step, ..., end` (MATLAB `start:step:end`).
    StepRange(isize, isize, isize),
    /// Arbitrary coordinate list, in the given order.
    Indices(Vec<isize>),
    /// Keep the coordinates whose mask entry is `true`.
    Mask(Vec<bool>),
}

impl From<RangeFull> for Selector {
    fn from(_: RangeFull) -> Self {
        Selector::All
    }
}

impl From<isize> for Selector {
    fn from(index: isize) -> Self {
        Selector::Index(index)
    }
}

impl From<Vec<isize>> for Selector {
    fn from(indices: Vec<isize>) -> Self {
        Selector::Indices(indices)
    }
}

impl From<Vec<bool>> for Selector {
    fn from(mask: Vec<bool>) -> Self {
        Selector::Mask(mask)
    }
}

/// Resolve a possibly negative position against `size`.
pub(crate) fn resolve_position(
    op: &'static str,
    dim: usize,
    index: isize,
    size: usize,
) -> Result<usize> {
    let resolved = if index < 0 {
        index + size as isize
    } else {
        index
    };
    if resolved < 0 || resolved >= size as isize {
        return Err(MatrixError::InvalidIndex {
            op,
            dim,
            index,
            size,
        });
    }
    Ok(resolved as usize)
}

/// Resolve `start, step, end` into `(start, factor, count)`.
pub(crate) fn resolve_range(
    op: &'static str,
    dim: usize,
    start: isize,
    step: isize,
    end: isize,
    size: usize,
) -> Result<(usize, isize, usize)> {
    let s = resolve_position(op, dim, start, size)?;
    let e = resolve_position(op, dim, end, size)?;
    let span = e as isize - s as isize;
    if step == 0 || (span != 0 && span.signum() != step.signum()) {
        return Err(MatrixError::InvalidStep { op, dim, step });
    }
    let count = span.unsigned_abs() / step.unsigned_abs() + 1;
    Ok((s, step, count))
}
