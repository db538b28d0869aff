//! Dimension fusion for extraction fast paths.
//!
//! Subsequent affine dimensions can be merged when `step[i] == size[i-1] * step[i-1]`.
//! A view whose non-singleton dimensions all merge into one is a plain strided range
//! and is copied with a single loop.

use crate::dim::Dim;

/// A view collapsed to `offset + k * step` for `k in 0..len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SingleStride {
    pub(crate) offset: isize,
    pub(crate) step: isize,
    pub(crate) len: usize,
}

/// Collapse `dims` to one strided range, if possible.
///
/// Singleton dimensions only shift the offset and are dropped first, whatever their
/// kind. Any remaining index-indexed dimension prevents fusion.
pub(crate) fn single_stride(dims: &[Dim]) -> Option<SingleStride> {
    let mut offset = 0isize;
    let mut kept: Vec<(isize, usize)> = Vec::with_capacity(dims.len());
    for dim in dims {
        if dim.size() == 1 {
            offset += dim.offset(0);
            continue;
        }
        match dim {
            Dim::Affine { first, step, size } => {
                offset += first;
                kept.push((*step, *size));
            }
            Dim::Indexed(_) => return None,
        }
    }

    let Some(&(step, mut len)) = kept.first() else {
        return Some(SingleStride {
            offset,
            step: 1,
            len: 1,
        });
    };
    for w in kept.windows(2) {
        let (prev_step, prev_size) = w[0];
        let (next_step, next_size) = w[1];
        if next_step != prev_size as isize * prev_step {
            return None;
        }
        len *= next_size;
    }
    Some(SingleStride { offset, step, len })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn affine(first: isize, step: isize, size: usize) -> Dim {
        Dim::Affine { first, step, size }
    }

    #[test]
    fn test_contiguous_fuses() {
        let dims = [affine(0, 1, 3), affine(0, 3, 4)];
        assert_eq!(
            single_stride(&dims),
            Some(SingleStride {
                offset: 0,
                step: 1,
                len: 12
            })
        );
    }

    #[test]
    fn test_singletons_shift_offset() {
        let dims = [affine(2, 1, 1), Dim::Indexed(vec![6]), affine(0, 9, 3)];
        assert_eq!(
            single_stride(&dims),
            Some(SingleStride {
                offset: 8,
                step: 9,
                len: 3
            })
        );
    }

    #[test]
    fn test_gap_prevents_fusion() {
        let dims = [affine(0, 1, 2), affine(0, 3, 4)];
        assert_eq!(single_stride(&dims), None);
    }

    #[test]
    fn test_indexed_prevents_fusion() {
        let dims = [Dim::Indexed(vec![0, 1]), affine(0, 2, 2)];
        assert_eq!(single_stride(&dims), None);
    }

    #[test]
    fn test_reversed_fuses() {
        // Fully flipped 2x2: steps -1 and -2.
        let dims = [affine(1, -1, 2), affine(2, -2, 2)];
        assert_eq!(
            single_stride(&dims),
            Some(SingleStride {
                offset: 3,
                step: -1,
                len: 4
            })
        );
    }

    #[test]
    fn test_all_singletons() {
        let dims = [affine(4, 1, 1), affine(0, 5, 1)];
        assert_eq!(
            single_stride(&dims),
            Some(SingleStride {
                offset: 4,
                step: 1,
                len: 1
            })
        );
    }
}
