//! Detected meaningful intervals.

use std::cmp::Ordering;
use std::f64::consts::TAU;
use std::fmt;

/// A meaningful interval `[a, b]` of an `L`-bin histogram.
///
/// `a > b` denotes an interval wrapping from bin `L - 1` to bin 0. Fields are fixed at
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Mode {
    bins: [usize; 2],
    measure: f64,
    norm: Option<f64>,
    phase: f64,
}

impl Mode {
    /// Build a mode over `bins` of an `len`-bin histogram. The mass and the barycenter
    /// use `histogram` as weights when given.
    pub fn new(bins: [usize; 2], measure: f64, len: usize, histogram: Option<&[f64]>) -> Self {
        let norm = histogram.map(|h| bin_range(bins, len).map(|i| h[i]).sum::<f64>());
        let phase = Self::bary_center(bins, len, histogram);
        Self {
            bins,
            measure,
            norm,
            phase,
        }
    }

    /// First and last bin, inclusive.
    #[inline]
    pub fn bins(&self) -> [usize; 2] {
        self.bins
    }

    /// Significance of the interval.
    #[inline]
    pub fn measure(&self) -> f64 {
        self.measure
    }

    /// Histogram mass inside the interval.
    #[inline]
    pub fn norm(&self) -> Option<f64> {
        self.norm
    }

    /// Circular barycenter of the interval, in `[0, 1)`.
    #[inline]
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Number of bins covered.
    pub fn width(&self, len: usize) -> usize {
        let [a, b] = self.bins;
        if a <= b {
            b - a + 1
        } else {
            len - a + b + 1
        }
    }

    pub fn contains(&self, bin: usize) -> bool {
        let [a, b] = self.bins;
        if a <= b {
            a <= bin && bin <= b
        } else {
            bin >= a || bin <= b
        }
    }

    /// Weighted circular mean of the bin positions `i / len` of `bins`.
    ///
    /// Bins are weighted by `histogram` when given and not all zero, uniformly
    /// otherwise.
    pub fn bary_center(bins: [usize; 2], len: usize, histogram: Option<&[f64]>) -> f64 {
        let weighted = histogram.filter(|h| bin_range(bins, len).any(|i| h[i] > 0.0));
        let (mut c, mut s) = (0.0, 0.0);
        for i in bin_range(bins, len) {
            let w = weighted.map_or(1.0, |h| h[i]);
            let angle = TAU * i as f64 / len as f64;
            c += w * angle.cos();
            s += w * angle.sin();
        }
        let phase = (s.atan2(c) / TAU).rem_euclid(1.0);
        if phase >= 1.0 {
            0.0
        } else {
            phase
        }
    }

    /// Ordering by decreasing measure, then by first bin.
    pub fn compar(a: &Mode, b: &Mode) -> Ordering {
        b.measure
            .partial_cmp(&a.measure)
            .unwrap_or(Ordering::Equal)
            .then(a.bins[0].cmp(&b.bins[0]))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}] measure={:.6} phase={:.4}",
            self.bins[0], self.bins[1], self.measure, self.phase
        )?;
        if let Some(norm) = self.norm {
            write!(f, " norm={norm}")?;
        }
        Ok(())
    }
}

/// Bins of `[a, b]`, wrapping when `a > b`.
fn bin_range(bins: [usize; 2], len: usize) -> impl Iterator<Item = usize> {
    let [a, b] = bins;
    let width = if a <= b { b - a + 1 } else { len - a + b + 1 };
    (0..width).map(move |k| (a + k) % len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_norm_and_phase() {
        let hist = [1.0, 1.0, 1.0, 50.0, 50.0, 1.0, 1.0, 1.0];
        let mode = Mode::new([3, 4], 0.5, 8, Some(&hist));
        assert_eq!(mode.norm(), Some(100.0));
        assert_relative_eq!(mode.phase(), 3.5 / 8.0, epsilon = 1e-12);
        assert_eq!(mode.width(8), 2);
    }

    #[test]
    fn test_wrapping_interval() {
        let hist = [4.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 4.0];
        let mode = Mode::new([7, 0], 1.0, 8, Some(&hist));
        assert_eq!(mode.width(8), 2);
        assert!(mode.contains(7) && mode.contains(0) && !mode.contains(3));
        assert_eq!(mode.norm(), Some(8.0));
        // Halfway between bin 7 and bin 0 (= bin 8).
        assert_relative_eq!(mode.phase(), 7.5 / 8.0, epsilon = 1e-12);
    }

    #[test]
    fn test_phase_without_histogram() {
        let mode = Mode::new([0, 2], 1.0, 12, None);
        assert_eq!(mode.norm(), None);
        assert_relative_eq!(mode.phase(), 1.0 / 12.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_mass_uses_uniform_weights() {
        let hist = [0.0; 6];
        assert_relative_eq!(
            Mode::bary_center([1, 3], 6, Some(&hist)),
            2.0 / 6.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_compar_sorts_descending() {
        let mut modes = vec![
            Mode::new([0, 0], 0.1, 4, None),
            Mode::new([2, 3], 0.7, 4, None),
            Mode::new([1, 1], 0.7, 4, None),
        ];
        modes.sort_by(Mode::compar);
        let bins: Vec<_> = modes.iter().map(Mode::bins).collect();
        assert_eq!(bins, vec![[1, 1], [2, 3], [0, 0]]);
    }

    #[test]
    fn test_display() {
        let mode = Mode::new([1, 2], 0.25, 4, Some(&[0.0, 1.0, 2.0, 0.0]));
        let text = mode.to_string();
        assert!(text.starts_with("[1, 2] measure=0.250000"));
        assert!(text.ends_with("norm=3"));
    }
}
