//! Iteration protocol over view offsets.
//!
//! A cursor walks the linear offsets of one dimension, a [`ViewIter`] walks every
//! dimension from a given one upwards. All of them implement [`IndexIterator`]:
//!
//! ```text
//! let mut it = view.iter();
//! let mut idx = it.begin(0);
//! while !it.is_end() {
//!     /* use idx */
//!     idx = it.advance();
//! }
//! ```
//!
//! The strided cursor stops on a precomputed index `start + step * size`. The indexed
//! cursor adds precomputed deltas (see [`Dim::steps`]) whose final entry brings it to
//! `base - 1`, so both hot loops only add and compare.

use crate::dim::Dim;

/// End marker of a [`ViewIter`].
pub const END: isize = -1;

/// Minimal iteration interface shared by every cursor kind.
pub trait IndexIterator {
    /// Reset to the first element given the linear offset of the outer dimensions.
    /// Returns that first linear index.
    fn begin(&mut self, offset: isize) -> isize;

    /// Step once. Returns the new linear index, or [`end`](Self::end) once exhausted.
    fn advance(&mut self) -> isize;

    /// True iff the most recently returned index is the end marker.
    fn is_end(&self) -> bool;

    /// The end marker of the current pass.
    fn end(&self) -> isize;

    /// Current coordinate along the governed dimensions, innermost first.
    fn position(&self) -> Vec<usize>;
}

// ============================================================================
// Strided cursor
// ============================================================================

/// Cursor over an affine dimension.
#[derive(Debug, Clone)]
pub struct StridedCursor {
    first: isize,
    step: isize,
    size: usize,
    start: isize,
    stop: isize,
    cur: isize,
}

impl StridedCursor {
    pub fn new(first: isize, step: isize, size: usize) -> Self {
        let stop = first + step * size as isize;
        Self {
            first,
            step,
            size,
            start: first,
            stop,
            cur: first,
        }
    }
}

impl IndexIterator for StridedCursor {
    #[inline]
    fn begin(&mut self, offset: isize) -> isize {
        self.start = offset + self.first;
        self.stop = self.start + self.step * self.size as isize;
        self.cur = self.start;
        self.cur
    }

    #[inline]
    fn advance(&mut self) -> isize {
        if self.cur != self.stop {
            self.cur += self.step;
        }
        self.cur
    }

    #[inline]
    fn is_end(&self) -> bool {
        self.cur == self.stop
    }

    #[inline]
    fn end(&self) -> isize {
        self.stop
    }

    fn position(&self) -> Vec<usize> {
        vec![((self.cur - self.start) / self.step) as usize]
    }
}

// ============================================================================
// Indexed cursor
// ============================================================================

/// Cursor over an explicit index list, driven by precomputed deltas.
#[derive(Debug, Clone)]
pub struct IndexedCursor {
    first: isize,
    steps: Vec<isize>,
    k: usize,
    base: isize,
    cur: isize,
}

impl IndexedCursor {
    /// Build from a non-empty index list.
    pub fn new(indices: &[isize]) -> Self {
        let steps = Dim::Indexed(indices.to_vec()).steps();
        Self {
            first: indices[0],
            steps,
            k: 0,
            base: 0,
            cur: indices[0],
        }
    }
}

impl IndexIterator for IndexedCursor {
    #[inline]
    fn begin(&mut self, offset: isize) -> isize {
        self.base = offset;
        self.k = 0;
        self.cur = offset + self.first;
        self.cur
    }

    #[inline]
    fn advance(&mut self) -> isize {
        if self.k < self.steps.len() {
            self.cur += self.steps[self.k];
            self.k += 1;
        }
        self.cur
    }

    #[inline]
    fn is_end(&self) -> bool {
        self.cur == self.base - 1
    }

    #[inline]
    fn end(&self) -> isize {
        self.base - 1
    }

    fn position(&self) -> Vec<usize> {
        vec![self.k]
    }
}

// ============================================================================
// Per-dimension dispatch
// ============================================================================

/// Either cursor kind, chosen from the dimension's descriptor.
#[derive(Debug, Clone)]
pub enum DimCursor {
    Strided(StridedCursor),
    Indexed(IndexedCursor),
}

impl From<&Dim> for DimCursor {
    fn from(dim: &Dim) -> Self {
        match dim {
            Dim::Affine { first, step, size } => {
                DimCursor::Strided(StridedCursor::new(*first, *step, *size))
            }
            Dim::Indexed(indices) => DimCursor::Indexed(IndexedCursor::new(indices)),
        }
    }
}

impl IndexIterator for DimCursor {
    #[inline]
    fn begin(&mut self, offset: isize) -> isize {
        match self {
            DimCursor::Strided(c) => c.begin(offset),
            DimCursor::Indexed(c) => c.begin(offset),
        }
    }

    #[inline]
    fn advance(&mut self) -> isize {
        match self {
            DimCursor::Strided(c) => c.advance(),
            DimCursor::Indexed(c) => c.advance(),
        }
    }

    #[inline]
    fn is_end(&self) -> bool {
        match self {
            DimCursor::Strided(c) => c.is_end(),
            DimCursor::Indexed(c) => c.is_end(),
        }
    }

    #[inline]
    fn end(&self) -> isize {
        match self {
            DimCursor::Strided(c) => c.end(),
            DimCursor::Indexed(c) => c.end(),
        }
    }

    fn position(&self) -> Vec<usize> {
        match self {
            DimCursor::Strided(c) => c.position(),
            DimCursor::Indexed(c) => c.position(),
        }
    }
}

// ============================================================================
// Composite iterator
// ============================================================================

/// Odometer over a run of dimensions (innermost first).
///
/// When the cursor of dimension `d` runs out, the first non-exhausted cursor above it
/// is advanced and every cursor below is restarted from the new base offset. The
/// walk ends when the outermost cursor runs out. With no governed dimension the
/// iterator yields its base offset once.
///
/// Also usable as a plain [`Iterator`] over linear indices, starting from offset 0.
#[derive(Debug, Clone)]
pub struct ViewIter {
    cursors: Vec<DimCursor>,
    cur: isize,
    done: bool,
    total: usize,
    remaining: usize,
}

impl ViewIter {
    pub(crate) fn new(dims: &[Dim]) -> Self {
        let cursors: Vec<DimCursor> = dims.iter().map(DimCursor::from).collect();
        let total = dims.iter().map(Dim::size).product();
        let mut it = Self {
            cursors,
            cur: 0,
            done: false,
            total,
            remaining: total,
        };
        it.begin(0);
        it
    }

    /// Number of governed dimensions.
    pub fn ndim(&self) -> usize {
        self.cursors.len()
    }
}

impl IndexIterator for ViewIter {
    fn begin(&mut self, offset: isize) -> isize {
        let mut base = offset;
        for cursor in self.cursors.iter_mut().rev() {
            base = cursor.begin(base);
        }
        self.cur = base;
        self.done = false;
        self.remaining = self.total;
        self.cur
    }

    fn advance(&mut self) -> isize {
        if self.done {
            return END;
        }
        self.remaining -= 1;
        let n = self.cursors.len();
        let mut d = 0;
        while d < n {
            let idx = self.cursors[d].advance();
            if !self.cursors[d].is_end() {
                let mut base = idx;
                for cursor in self.cursors[..d].iter_mut().rev() {
                    base = cursor.begin(base);
                }
                self.cur = base;
                return self.cur;
            }
            d += 1;
        }
        self.done = true;
        self.cur = END;
        END
    }

    #[inline]
    fn is_end(&self) -> bool {
        self.done
    }

    #[inline]
    fn end(&self) -> isize {
        END
    }

    fn position(&self) -> Vec<usize> {
        self.cursors.iter().flat_map(|c| c.position()).collect()
    }
}

impl Iterator for ViewIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.done {
            return None;
        }
        let idx = self.cur;
        self.advance();
        Some(idx as usize)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = if self.done { 0 } else { self.remaining };
        (n, Some(n))
    }
}

impl ExactSizeIterator for ViewIter {}
