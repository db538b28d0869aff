//! Interval tables of a histogram.
//!
//! Every interval `[i, j]` of an `L`-bin histogram owns the cell `i * L + j` of an
//! [`IntervalMatrix`]. Linear histograms use the cells `i <= j`. Circular histograms
//! also use `i > j`, the intervals wrapping from bin `L - 1` back to bin 0.
//!
//! The dynamic programs in [`select`](super::select) address intervals by
//! `(start, width)` instead; [`IntervalMatrix::at`] maps between the two.

use std::ops::Range;

/// Square `L x L` table of per-interval values.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalMatrix {
    len: usize,
    circular: bool,
    data: Vec<f64>,
}

impl IntervalMatrix {
    pub fn zeros(len: usize, circular: bool) -> Self {
        Self {
            len,
            circular,
            data: vec![0.0; len * len],
        }
    }

    /// Number of histogram bins `L`.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_circular(&self) -> bool {
        self.circular
    }

    /// Row-major cells, `L * L` of them.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Value of interval `[i, j]`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.len + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.len + j] = value;
    }

    /// Longest interval taken into account. The whole circle is left out of circular
    /// tables: every bin start describes it, and it never departs from any null model.
    #[inline]
    pub fn max_width(&self) -> usize {
        if self.circular {
            self.len.saturating_sub(1)
        } else {
            self.len
        }
    }

    /// Valid starting bins for intervals of `width` bins.
    #[inline]
    pub fn starts(&self, width: usize) -> Range<usize> {
        if self.circular {
            0..self.len
        } else {
            0..self.len + 1 - width
        }
    }

    /// Last bin of the interval of `width` bins starting at `start`.
    #[inline]
    pub fn end_of(&self, start: usize, width: usize) -> usize {
        (start + width - 1) % self.len
    }

    /// Value of the interval of `width` bins starting at `start`.
    #[inline]
    pub fn at(&self, start: usize, width: usize) -> f64 {
        self.get(start, self.end_of(start, width))
    }

    #[inline]
    pub fn set_at(&mut self, start: usize, width: usize, value: f64) {
        let end = self.end_of(start, width);
        self.set(start, end, value);
    }

    /// Every `(start, width)` pair taken into account, shortest intervals first.
    pub fn arcs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (1..=self.max_width()).flat_map(move |w| self.starts(w).map(move |a| (a, w)))
    }
}

/// Running sum of `values`.
pub fn cumulate(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |acc, &v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}

/// Mass of every interval, from a cumulative histogram whose last entry is `total`.
///
/// `[0, j]` holds `cum[j]`, `[i, j]` holds `cum[j] - cum[i - 1]` and, for circular
/// histograms, a wrapping `[i, j]` (`i > j`) holds `cum[j] + total - cum[i - 1]`.
pub fn vector_to_intervals(cum: &[f64], circular: bool, total: f64) -> IntervalMatrix {
    let len = cum.len();
    let mut m = IntervalMatrix::zeros(len, circular);
    for j in 0..len {
        m.set(0, j, cum[j]);
    }
    for i in 1..len {
        let before = cum[i - 1];
        for j in i..len {
            m.set(i, j, cum[j] - before);
        }
        if circular {
            for j in 0..i {
                m.set(i, j, cum[j] + total - before);
            }
        }
    }
    m
}
