//! Strided and indexed views over flat buffers, with meaningful mode/gap detection.
//!
//! This crate provides the addressing layer of a MATLAB-like dense array library:
//! a [`View`] describes which elements of a flat, column-major buffer take part in an
//! operation and in which order, without ever owning the buffer itself. Independently,
//! the [`histogram`] module finds statistically meaningful intervals (modes and gaps)
//! of a histogram under a uniform or Gaussian-weighted null model.
//!
//! # Core Types
//!
//! - [`View`]: per-dimension `(first, step, size)` descriptors or explicit index lists,
//!   with selection, permutation, flips, circular shift and a save/restore stack
//! - [`Dim`]: the tagged per-dimension descriptor (`Affine` or `Indexed`)
//! - [`Selector`]: one selection argument (`All`, `Index`, ranges, index lists, masks)
//! - [`IndexIterator`]: the iteration protocol, implemented by [`StridedCursor`],
//!   [`IndexedCursor`] and the composite [`ViewIter`]
//! - [`Mode`]: a detected meaningful interval
//!
//! # Extraction
//!
//! - [`View::extract_from`] / [`View::extract_from_into`]: gather the selected elements
//!   of a full-size buffer into a compact buffer
//! - [`View::extract_to`]: scatter a compact buffer into the selected positions of a
//!   full-size buffer
//! - [`View::extract`]: view-to-view transfer between two independently shaped views
//!
//! # Example
//!
//! ```rust
//! use matview::{Selector, View};
//!
//! // 3x3 column-major data: columns are [0, 1, 2], [3, 4, 5], [6, 7, 8].
//! let data: Vec<f64> = (0..9).map(|x| x as f64).collect();
//! let mut view = View::new(&[3, 3]).unwrap();
//!
//! view.save();
//! view.select(&[Selector::All, Selector::Index(0)]).unwrap();
//! assert_eq!(view.extract_from(&data).unwrap(), vec![0.0, 1.0, 2.0]);
//!
//! view.restore();
//! view.select(&[Selector::Index(0)]).unwrap();
//! assert_eq!(view.extract_from(&data).unwrap(), vec![0.0, 3.0, 6.0]);
//! ```
//!
//! # Histogram Example
//!
//! ```rust
//! use matview::histogram::{get_modes, ModeParams};
//!
//! let hist = [1.0, 1.0, 1.0, 50.0, 50.0, 1.0, 1.0, 1.0];
//! let modes = get_modes(&hist, &ModeParams::default()).unwrap();
//! assert_eq!(modes[0].bins(), [3, 4]);
//! ```

mod dim;
mod extract;
mod fuse;
pub mod histogram;
pub mod iter;
mod view;

// ============================================================================
// View types
// ============================================================================
pub use dim::{Dim, Selector};
pub use view::{col_major_steps, View};

// ============================================================================
// Iteration protocol
// ============================================================================
pub use iter::{DimCursor, IndexIterator, IndexedCursor, StridedCursor, ViewIter, END};

// ============================================================================
// Histogram analysis
// ============================================================================
pub use histogram::{get_gaps, get_modes, get_modes_and_gaps, Mode, ModeParams, ModesAndGaps};

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur during view, extraction and histogram operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatrixError {
    /// A dimension argument exceeds the view's rank.
    #[error("{op}: invalid dimension {dim} for rank {rank}")]
    InvalidDimension {
        op: &'static str,
        dim: usize,
        rank: usize,
    },

    /// An index argument falls outside the targeted dimension.
    #[error("{op}: index {index} out of bounds for dimension {dim} of size {size}")]
    InvalidIndex {
        op: &'static str,
        dim: usize,
        index: isize,
        size: usize,
    },

    /// A stride factor is zero or walks away from the requested end.
    #[error("{op}: invalid step {step} for dimension {dim}")]
    InvalidStep {
        op: &'static str,
        dim: usize,
        step: isize,
    },

    /// An index list or boolean mask selects no element.
    #[error("{op}: empty selection on dimension {dim}")]
    EmptySelection { op: &'static str, dim: usize },

    /// A mask or argument list does not match the size derived from the view.
    #[error("{op}: dimension mismatch, expected {expected}, got {got}")]
    DimensionMismatch {
        op: &'static str,
        expected: usize,
        got: usize,
    },

    /// A shift is outside `[1 - rank, rank - 1]`.
    #[error("shift_dimension: invalid shift {shift} for rank {rank}")]
    InvalidShift { shift: isize, rank: usize },

    /// A permutation order is not a bijection over `0..order.len()` covering the rank.
    #[error("permute: invalid permutation {order:?} for rank {rank}")]
    InvalidPermutation { order: Vec<usize>, rank: usize },

    /// A buffer length does not match the view's current or initial length.
    #[error("{op}: invalid buffer length, expected {expected}, got {got}")]
    InvalidLength {
        op: &'static str,
        expected: usize,
        got: usize,
    },

    /// An affine-only query was made on an index-indexed dimension.
    #[error("{op}: unsupported on index-indexed dimension {dim}")]
    UnsupportedOperation { op: &'static str, dim: usize },

    /// A shape contains a zero-sized dimension.
    #[error("invalid shape {0:?}")]
    InvalidShape(Vec<usize>),

    /// A histogram, ground pdf or point count is unusable.
    #[error("invalid histogram: {0}")]
    InvalidHistogram(String),
}

/// Result type for view, extraction and histogram operations.
pub type Result<T> = std::result::Result<T, MatrixError>;
