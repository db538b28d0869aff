//! Strided/indexed views over flat column-major buffers.
//!
//! A [`View`] never touches data. It holds one [`Dim`] per dimension, the state it was
//! built with, and a stack of saved states. Every selection and permutation operator
//! mutates the view in place and returns `&mut Self`, so calls chain with `?`:
//!
//! ```rust
//! use matview::{Selector, View};
//!
//! let mut view = View::new(&[4, 5]).unwrap();
//! view.select_dimension(0, Selector::Range(1, 2))?
//!     .flipdim(1)?
//!     .swap_dimensions(0, 1)?;
//! assert_eq!(view.shape(), vec![5, 2]);
//! # Ok::<(), matview::MatrixError>(())
//! ```

use std::fmt;

use log::trace;

use crate::dim::{resolve_position, resolve_range, Dim, Selector};
use crate::iter::ViewIter;
use crate::{MatrixError, Result};

/// Compute column-major steps (first dimension varies fastest).
pub fn col_major_steps(shape: &[usize]) -> Vec<isize> {
    let rank = shape.len();
    if rank == 0 {
        return vec![];
    }
    let mut steps = vec![1isize; rank];
    for i in 1..rank {
        steps[i] = steps[i - 1] * shape[i - 1] as isize;
    }
    steps
}

/// Addressing window over a flat buffer of `initial_len()` elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    dims: Vec<Dim>,
    initial: Vec<Dim>,
    stack: Vec<Vec<Dim>>,
}

impl View {
    /// Create the identity view over `shape`.
    ///
    /// An empty shape is treated as a scalar (`[1]`).
    ///
    /// # Errors
    /// Returns [`MatrixError::InvalidShape`] if any dimension is zero.
    pub fn new(shape: &[usize]) -> Result<Self> {
        if shape.contains(&0) {
            return Err(MatrixError::InvalidShape(shape.to_vec()));
        }
        let shape = if shape.is_empty() { &[1][..] } else { shape };
        let dims: Vec<Dim> = shape
            .iter()
            .zip(col_major_steps(shape))
            .map(|(&size, step)| Dim::Affine {
                first: 0,
                step,
                size,
            })
            .collect();
        Ok(Self {
            initial: dims.clone(),
            dims,
            stack: Vec::new(),
        })
    }

    /// Deep copy of another view's descriptors, without its saved states.
    pub fn from_view(other: &View) -> Self {
        Self {
            dims: other.dims.clone(),
            initial: other.initial.clone(),
            stack: Vec::new(),
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Number of dimensions.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Per-dimension descriptors.
    #[inline]
    pub fn dims(&self) -> &[Dim] {
        &self.dims
    }

    /// Current size of every dimension.
    pub fn shape(&self) -> Vec<usize> {
        self.dims.iter().map(Dim::size).collect()
    }

    /// Size of dimension `dim`; dimensions past the rank are singletons.
    #[inline]
    pub fn size(&self, dim: usize) -> usize {
        self.dims.get(dim).map_or(1, Dim::size)
    }

    /// Number of selected elements.
    pub fn len(&self) -> usize {
        self.dims.iter().map(Dim::size).product()
    }

    /// Always false: every dimension keeps at least one element.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Shape the view was constructed with.
    pub fn initial_shape(&self) -> Vec<usize> {
        self.initial.iter().map(Dim::size).collect()
    }

    /// Length of the buffer the view addresses.
    pub fn initial_len(&self) -> usize {
        self.initial.iter().map(Dim::size).product()
    }

    /// True when the view is back to its construction-time state.
    pub fn is_initial(&self) -> bool {
        self.dims == self.initial
    }

    /// Offset of the first element along an affine dimension.
    pub fn first(&self, dim: usize) -> Result<isize> {
        match self.dim_ref("first", dim)? {
            Dim::Affine { first, .. } => Ok(*first),
            Dim::Indexed(_) => Err(MatrixError::UnsupportedOperation { op: "first", dim }),
        }
    }

    /// Step between consecutive elements along an affine dimension.
    pub fn step(&self, dim: usize) -> Result<isize> {
        match self.dim_ref("step", dim)? {
            Dim::Affine { step, .. } => Ok(*step),
            Dim::Indexed(_) => Err(MatrixError::UnsupportedOperation { op: "step", dim }),
        }
    }

    /// Offset contributed by the last element along `dim`.
    pub fn end(&self, dim: usize) -> Result<isize> {
        Ok(self.dim_ref("end", dim)?.last())
    }

    pub fn is_indices_indexed(&self, dim: usize) -> Result<bool> {
        Ok(self.dim_ref("is_indices_indexed", dim)?.is_indexed())
    }

    /// Per-coordinate offsets along `dim` (materialized for affine dimensions).
    pub fn indices(&self, dim: usize) -> Result<Vec<isize>> {
        Ok(self.dim_ref("indices", dim)?.to_indices())
    }

    /// Offset deltas along `dim`, terminated by `-(last + 1)`.
    pub fn steps(&self, dim: usize) -> Result<Vec<isize>> {
        Ok(self.dim_ref("steps", dim)?.steps())
    }

    /// Linear index of a coordinate tuple. Missing trailing coordinates are zero.
    pub fn linear_index(&self, coords: &[usize]) -> Result<usize> {
        if coords.len() > self.dims.len() {
            return Err(MatrixError::DimensionMismatch {
                op: "linear_index",
                expected: self.dims.len(),
                got: coords.len(),
            });
        }
        let mut idx = 0isize;
        for (d, dim) in self.dims.iter().enumerate() {
            let c = coords.get(d).copied().unwrap_or(0);
            if c >= dim.size() {
                return Err(MatrixError::InvalidIndex {
                    op: "linear_index",
                    dim: d,
                    index: c as isize,
                    size: dim.size(),
                });
            }
            idx += dim.offset(c);
        }
        Ok(idx as usize)
    }

    /// Iterator over every selected linear index, dimension 0 fastest.
    pub fn iter(&self) -> ViewIter {
        ViewIter::new(&self.dims)
    }

    /// Iterator over dimensions `dim..` only; it yields the base offsets an inner loop
    /// over dimensions `..dim` starts from.
    pub fn iter_from(&self, dim: usize) -> ViewIter {
        ViewIter::new(&self.dims[dim.min(self.dims.len())..])
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Apply one selector to dimension `dim`.
    pub fn select_dimension(&mut self, dim: usize, selector: Selector) -> Result<&mut Self> {
        self.check_dim("select_dimension", dim)?;
        let new_dim = selected("select_dimension", dim, &self.dims[dim], &selector)?;
        trace!("select_dimension({dim}, {selector:?}) -> size {}", new_dim.size());
        self.dims[dim] = new_dim;
        Ok(self)
    }

    /// Keep the coordinates `indices` of dimension `dim`, in that order.
    ///
    /// The dimension becomes index-indexed; the positions are composed with its current
    /// mapping so repeated selections nest.
    pub fn select_indices_dimension(&mut self, dim: usize, indices: &[isize]) -> Result<&mut Self> {
        self.check_dim("select_indices_dimension", dim)?;
        let new_dim = selected_indices("select_indices_dimension", dim, &self.dims[dim], indices)?;
        trace!("select_indices_dimension({dim}) -> {} indices", indices.len());
        self.dims[dim] = new_dim;
        Ok(self)
    }

    /// Keep the coordinates of dimension `dim` whose mask entry is `true`.
    pub fn select_boolean_dimension(&mut self, dim: usize, mask: &[bool]) -> Result<&mut Self> {
        self.check_dim("select_boolean_dimension", dim)?;
        let new_dim = selected_mask("select_boolean_dimension", dim, &self.dims[dim], mask)?;
        self.dims[dim] = new_dim;
        Ok(self)
    }

    /// Apply one selector per leading dimension; dimensions without a selector are kept.
    ///
    /// Either every selector applies or the view is left untouched.
    pub fn select(&mut self, selectors: &[Selector]) -> Result<&mut Self> {
        if selectors.len() > self.dims.len() {
            return Err(MatrixError::InvalidDimension {
                op: "select",
                dim: selectors.len() - 1,
                rank: self.dims.len(),
            });
        }
        let mut dims = self.dims.clone();
        for (d, selector) in selectors.iter().enumerate() {
            dims[d] = selected("select", d, &dims[d], selector)?;
        }
        self.dims = dims;
        trace!("select -> shape {:?}", self.shape());
        Ok(self)
    }

    // ========================================================================
    // Permutation
    // ========================================================================

    /// Exchange two dimensions, padding with singletons when either is past the rank.
    pub fn swap_dimensions(&mut self, a: usize, b: usize) -> Result<&mut Self> {
        self.pad_to(a.max(b) + 1);
        self.dims.swap(a, b);
        Ok(self)
    }

    /// Rotate the dimension list left by `n` (right when negative).
    ///
    /// With `None`, leading singleton dimensions are removed instead (their offset is
    /// folded into the next dimension) and at least one dimension remains.
    pub fn shift_dimension(&mut self, n: Option<isize>) -> Result<&mut Self> {
        let rank = self.dims.len();
        match n {
            Some(n) => {
                if n <= -(rank as isize) || n >= rank as isize {
                    return Err(MatrixError::InvalidShift { shift: n, rank });
                }
                if n >= 0 {
                    self.dims.rotate_left(n as usize);
                } else {
                    self.dims.rotate_right(n.unsigned_abs());
                }
            }
            None => {
                let mut offset = 0isize;
                while self.dims.len() > 1 && self.dims[0].size() == 1 {
                    offset += self.dims.remove(0).offset(0);
                }
                self.dims[0].add_offset(offset);
            }
        }
        trace!("shift_dimension({n:?}) -> shape {:?}", self.shape());
        Ok(self)
    }

    /// Reorder dimensions: new dimension `i` is old dimension `order[i]`.
    ///
    /// `order` must be a permutation of `0..order.len()` with `order.len() >= ndim()`;
    /// the view is padded with singletons up to that length.
    pub fn permute(&mut self, order: &[usize]) -> Result<&mut Self> {
        let rank = self.dims.len();
        if !is_permutation(order) || order.len() < rank {
            return Err(MatrixError::InvalidPermutation {
                order: order.to_vec(),
                rank,
            });
        }
        self.pad_to(order.len());
        // Walk each cycle, swapping the next source into place.
        let mut done = vec![false; order.len()];
        for i in 0..order.len() {
            if done[i] {
                continue;
            }
            done[i] = true;
            let mut j = i;
            while order[j] != i {
                let k = order[j];
                self.dims.swap(j, k);
                done[k] = true;
                j = k;
            }
        }
        trace!("permute({order:?}) -> shape {:?}", self.shape());
        Ok(self)
    }

    /// Inverse of [`permute`](Self::permute): old dimension `i` becomes `order[i]`.
    pub fn ipermute(&mut self, order: &[usize]) -> Result<&mut Self> {
        if !is_permutation(order) {
            return Err(MatrixError::InvalidPermutation {
                order: order.to_vec(),
                rank: self.dims.len(),
            });
        }
        let mut inverse = vec![0; order.len()];
        for (i, &o) in order.iter().enumerate() {
            inverse[o] = i;
        }
        self.permute(&inverse)
    }

    // ========================================================================
    // Flips and rotations
    // ========================================================================

    /// Reverse dimension `dim`. Dimensions past the rank are singletons, so this is a
    /// no-op for them.
    pub fn flipdim(&mut self, dim: usize) -> Result<&mut Self> {
        if dim >= self.dims.len() {
            return Ok(self);
        }
        self.select_dimension(dim, Selector::StepRange(-1, -1, 0))
    }

    /// Reverse the columns (dimension 1).
    pub fn fliplr(&mut self) -> Result<&mut Self> {
        self.flipdim(1)
    }

    /// Reverse the rows (dimension 0).
    pub fn flipud(&mut self) -> Result<&mut Self> {
        self.flipdim(0)
    }

    /// Rotate the first two dimensions by `k * 90` degrees counterclockwise.
    pub fn rot90(&mut self, k: isize) -> Result<&mut Self> {
        match k.rem_euclid(4) {
            1 => {
                self.flipdim(1)?;
                self.swap_dimensions(0, 1)
            }
            2 => {
                self.flipdim(0)?;
                self.flipdim(1)
            }
            3 => {
                self.flipdim(0)?;
                self.swap_dimensions(0, 1)
            }
            _ => Ok(self),
        }
    }

    /// Circularly shift elements: with `dim = None`, `shifts[d]` applies to dimension
    /// `d`; otherwise the single shift applies to `dim`.
    ///
    /// A positive shift moves elements towards higher coordinates.
    pub fn circshift(&mut self, shifts: &[isize], dim: Option<usize>) -> Result<&mut Self> {
        let targets: Vec<(usize, isize)> = match dim {
            Some(d) => {
                if shifts.len() != 1 {
                    return Err(MatrixError::DimensionMismatch {
                        op: "circshift",
                        expected: 1,
                        got: shifts.len(),
                    });
                }
                vec![(d, shifts[0])]
            }
            None => shifts.iter().copied().enumerate().collect(),
        };
        let mut dims = self.dims.clone();
        for (d, shift) in targets {
            if d >= dims.len() {
                // Shifting a singleton changes nothing.
                continue;
            }
            let n = dims[d].size() as isize;
            if shift.rem_euclid(n) == 0 {
                continue;
            }
            let positions: Vec<usize> = (0..n).map(|i| (i - shift).rem_euclid(n) as usize).collect();
            dims[d] = dims[d].compose(&positions);
        }
        self.dims = dims;
        trace!("circshift({shifts:?}, {dim:?})");
        Ok(self)
    }

    // ========================================================================
    // Save / restore
    // ========================================================================

    /// Push the current state on the stack.
    pub fn save(&mut self) -> &mut Self {
        self.stack.push(self.dims.clone());
        trace!("save -> depth {}", self.stack.len());
        self
    }

    /// Pop the most recently saved state, or go back to the construction-time state
    /// when nothing is saved.
    pub fn restore(&mut self) -> &mut Self {
        self.dims = match self.stack.pop() {
            Some(dims) => dims,
            None => self.initial.clone(),
        };
        trace!("restore -> depth {}", self.stack.len());
        self
    }

    /// Number of saved states.
    pub fn saved(&self) -> usize {
        self.stack.len()
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn check_dim(&self, op: &'static str, dim: usize) -> Result<()> {
        if dim >= self.dims.len() {
            return Err(MatrixError::InvalidDimension {
                op,
                dim,
                rank: self.dims.len(),
            });
        }
        Ok(())
    }

    fn dim_ref(&self, op: &'static str, dim: usize) -> Result<&Dim> {
        self.check_dim(op, dim)?;
        Ok(&self.dims[dim])
    }

    fn pad_to(&mut self, rank: usize) {
        let step = self.initial_len() as isize;
        while self.dims.len() < rank {
            self.dims.push(Dim::Affine {
                first: 0,
                step,
                size: 1,
            });
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape: Vec<String> = self.shape().iter().map(usize::to_string).collect();
        write!(f, "View [{}]", shape.join("x"))?;
        for (d, dim) in self.dims.iter().enumerate() {
            match dim {
                Dim::Affine { first, step, size } => {
                    write!(f, "\n  dim {d}: first={first} step={step} size={size}")?
                }
                Dim::Indexed(indices) => write!(f, "\n  dim {d}: indices={indices:?}")?,
            }
        }
        Ok(())
    }
}

fn is_permutation(order: &[usize]) -> bool {
    let mut seen = vec![false; order.len()];
    for &o in order {
        if o >= order.len() || seen[o] {
            return false;
        }
        seen[o] = true;
    }
    true
}

/// New descriptor for `dim` after applying `selector`.
fn selected(op: &'static str, d: usize, dim: &Dim, selector: &Selector) -> Result<Dim> {
    let size = dim.size();
    let (start, factor, count) = match selector {
        Selector::All => return Ok(dim.clone()),
        Selector::Indices(indices) => return selected_indices(op, d, dim, indices),
        Selector::Mask(mask) => return selected_mask(op, d, dim, mask),
        Selector::Index(i) => (resolve_position(op, d, *i, size)?, 1, 1),
        Selector::Range(s, e) => {
            let s_pos = resolve_position(op, d, *s, size)?;
            let e_pos = resolve_position(op, d, *e, size)?;
            let factor = if e_pos >= s_pos { 1 } else { -1 };
            resolve_range(op, d, *s, factor, *e, size)?
        }
        Selector::StepRange(s, k, e) => resolve_range(op, d, *s, *k, *e, size)?,
    };
    Ok(dim.restrict(start, factor, count))
}

fn selected_indices(op: &'static str, d: usize, dim: &Dim, indices: &[isize]) -> Result<Dim> {
    if indices.is_empty() {
        return Err(MatrixError::EmptySelection { op, dim: d });
    }
    let size = dim.size();
    let mut positions = Vec::with_capacity(indices.len());
    for &index in indices {
        if index < 0 || index >= size as isize {
            return Err(MatrixError::InvalidIndex {
                op,
                dim: d,
                index,
                size,
            });
        }
        positions.push(index as usize);
    }
    Ok(dim.compose(&positions))
}

fn selected_mask(op: &'static str, d: usize, dim: &Dim, mask: &[bool]) -> Result<Dim> {
    if mask.len() != dim.size() {
        return Err(MatrixError::DimensionMismatch {
            op,
            expected: dim.size(),
            got: mask.len(),
        });
    }
    let indices: Vec<isize> = mask
        .iter()
        .enumerate()
        .filter(|(_, &keep)| keep)
        .map(|(i, _)| i as isize)
        .collect();
    selected_indices(op, d, dim, &indices)
}
