//! Moving data between flat buffers and views.
//!
//! The full-size buffer a view addresses has `initial_len()` elements; the compact
//! buffer holding the selection has `len()` elements, in iteration order (dimension 0
//! fastest). A compact buffer of length 1 is broadcast.
//!
//! Source and destination are `&[T]` and `&mut [T]`, so they can never alias.

use log::trace;

use crate::dim::Dim;
use crate::fuse::single_stride;
use crate::iter::IndexIterator;
use crate::view::View;
use crate::{MatrixError, Result};

fn check_len(op: &'static str, expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(MatrixError::InvalidLength { op, expected, got });
    }
    Ok(())
}

fn check_len_or_scalar(op: &'static str, expected: usize, got: usize) -> Result<()> {
    if got == 1 {
        return Ok(());
    }
    check_len(op, expected, got)
}

impl View {
    /// Scatter `src` (compact, or a scalar) into the selected positions of `dst`
    /// (full-size). Unselected positions of `dst` are left untouched.
    ///
    /// # Errors
    /// [`MatrixError::InvalidLength`] if `src.len()` is neither `len()` nor 1, or
    /// `dst.len() != initial_len()`.
    pub fn extract_to<T: Copy>(&self, src: &[T], dst: &mut [T]) -> Result<()> {
        check_len_or_scalar("extract_to", self.len(), src.len())?;
        check_len("extract_to", self.initial_len(), dst.len())?;
        if src.len() == 1 {
            let value = src[0];
            self.for_each_offset(|i| dst[i] = value);
        } else {
            let mut k = 0;
            self.for_each_offset(|i| {
                dst[i] = src[k];
                k += 1;
            });
        }
        Ok(())
    }

    /// Gather the selected elements of `src` (full-size, or a scalar) into a new
    /// compact buffer.
    pub fn extract_from<T: Copy>(&self, src: &[T]) -> Result<Vec<T>> {
        check_len_or_scalar("extract_from", self.initial_len(), src.len())?;
        if src.len() == 1 {
            return Ok(vec![src[0]; self.len()]);
        }
        let mut out = Vec::with_capacity(self.len());
        self.for_each_offset(|i| out.push(src[i]));
        Ok(out)
    }

    /// Gather the selected elements of `src` into the caller's compact buffer `dst`.
    pub fn extract_from_into<T: Copy>(&self, src: &[T], dst: &mut [T]) -> Result<()> {
        check_len_or_scalar("extract_from", self.initial_len(), src.len())?;
        check_len("extract_from", self.len(), dst.len())?;
        if src.len() == 1 {
            dst.fill(src[0]);
            return Ok(());
        }
        let mut k = 0;
        self.for_each_offset(|i| {
            dst[k] = src[i];
            k += 1;
        });
        Ok(())
    }

    /// Copy the elements this view selects in `src` to the elements `dst_view` selects
    /// in `dst`, pairing them in iteration order.
    ///
    /// # Errors
    /// [`MatrixError::DimensionMismatch`] if the views select different element
    /// counts; [`MatrixError::InvalidLength`] if a buffer does not match its view's
    /// initial length (`src` may also be a scalar).
    pub fn extract<T: Copy>(&self, src: &[T], dst_view: &View, dst: &mut [T]) -> Result<()> {
        if self.len() != dst_view.len() {
            return Err(MatrixError::DimensionMismatch {
                op: "extract",
                expected: self.len(),
                got: dst_view.len(),
            });
        }
        check_len_or_scalar("extract", self.initial_len(), src.len())?;
        check_len("extract", dst_view.initial_len(), dst.len())?;

        if src.len() == 1 {
            let value = src[0];
            dst_view.for_each_offset(|i| dst[i] = value);
            return Ok(());
        }

        if let (Some(s), Some(d)) = (single_stride(self.dims()), single_stride(dst_view.dims())) {
            trace!("extract: single-stride copy of {} elements", s.len);
            let mut si = s.offset;
            let mut di = d.offset;
            for _ in 0..s.len {
                dst[di as usize] = src[si as usize];
                si += s.step;
                di += d.step;
            }
            return Ok(());
        }

        trace!("extract: general copy of {} elements", self.len());
        let mut targets = dst_view.iter();
        self.for_each_offset(|i| {
            if let Some(j) = targets.next() {
                dst[j] = src[i];
            }
        });
        Ok(())
    }

    /// Call `f` with every selected linear index, in iteration order.
    ///
    /// Dimension 0 runs in a dedicated inner loop, either affine (fixed step) or indexed
    /// (precomputed deltas ending on `base - 1`); the outer dimensions are walked by a
    /// [`ViewIter`](crate::ViewIter).
    pub(crate) fn for_each_offset<F: FnMut(usize)>(&self, mut f: F) {
        if let Some(s) = single_stride(self.dims()) {
            let mut idx = s.offset;
            for _ in 0..s.len {
                f(idx as usize);
                idx += s.step;
            }
            return;
        }

        let mut outer = self.iter_from(1);
        let mut base = outer.begin(0);
        match &self.dims()[0] {
            Dim::Affine { first, step, size } => {
                while !outer.is_end() {
                    let mut idx = base + first;
                    for _ in 0..*size {
                        f(idx as usize);
                        idx += step;
                    }
                    base = outer.advance();
                }
            }
            Dim::Indexed(indices) => {
                let first = indices[0];
                let steps = self.dims()[0].steps();
                while !outer.is_end() {
                    let end = base - 1;
                    let mut idx = base + first;
                    let mut k = 0;
                    while idx != end {
                        f(idx as usize);
                        idx += steps[k];
                        k += 1;
                    }
                    base = outer.advance();
                }
            }
        }
    }
}
