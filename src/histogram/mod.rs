//! Meaningful mode and gap detection in histograms.
//!
//! An interval of bins is a *mode* when it holds significantly more mass than a null
//! model predicts, and a *gap* when it holds significantly less. Significance is
//! `-log10` of the tail probability divided by the point count `M`, compared against a
//! threshold corrected for the number of tested intervals (see [`entropy`]). Only
//! *maximal* meaningful intervals are reported: those that no interval containing them
//! or contained in them beats (see [`select`]).
//!
//! # Example
//!
//! ```rust
//! use matview::histogram::{get_modes_and_gaps, ModeParams};
//!
//! let hist = [2u32, 3, 2, 40, 45, 3, 2, 3];
//! let found = get_modes_and_gaps(&hist, &ModeParams::default().with_circular(true)).unwrap();
//! assert!(found.modes.iter().any(|m| m.contains(3) && m.contains(4)));
//! ```

pub mod entropy;
pub mod intervals;
mod mode;
pub mod select;
pub mod special;

pub use mode::Mode;

use log::debug;
use num_traits::ToPrimitive;

use crate::{MatrixError, Result};
use entropy::{entropy_fct, get_threshold, NullModel};
use intervals::{cumulate, vector_to_intervals, IntervalMatrix};
use select::{select_intervals, suppress_containing};

/// Parameters of a histogram analysis.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModeParams {
    /// Bins wrap around: bin `L - 1` neighbours bin 0.
    pub circular: bool,
    /// `-log10` of the expected number of false detections.
    pub eps: f64,
    /// Number of counted points `M`; the histogram's total mass when `None`.
    pub points: Option<f64>,
    /// Mean mass per point (Gaussian null model).
    pub mu: Option<f64>,
    /// Variance of the mass per point (Gaussian null model).
    pub sigma2: Option<f64>,
    /// Expected distribution over the bins, uniform when `None`. Normalized internally.
    pub ground_pdf: Option<Vec<f64>>,
}

impl ModeParams {
    pub fn with_circular(mut self, circular: bool) -> Self {
        self.circular = circular;
        self
    }

    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    pub fn with_points(mut self, points: f64) -> Self {
        self.points = Some(points);
        self
    }

    /// Switch to the Gaussian-weighted null model.
    pub fn with_gaussian(mut self, mu: f64, sigma2: f64) -> Self {
        self.mu = Some(mu);
        self.sigma2 = Some(sigma2);
        self
    }

    pub fn with_ground_pdf(mut self, ground_pdf: Vec<f64>) -> Self {
        self.ground_pdf = Some(ground_pdf);
        self
    }
}

/// Both kinds of meaningful intervals, each most significant first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModesAndGaps {
    pub modes: Vec<Mode>,
    pub gaps: Vec<Mode>,
}

/// Significance tables of one histogram.
struct Analysis {
    histogram: Vec<f64>,
    hmod: IntervalMatrix,
    hgap: IntervalMatrix,
    threshold: f64,
}

impl Analysis {
    fn new<T: ToPrimitive + Copy>(histogram: &[T], params: &ModeParams) -> Result<Self> {
        let histogram = to_masses(histogram, "bin")?;
        let len = histogram.len();
        if len == 0 {
            return Err(MatrixError::InvalidHistogram("empty histogram".into()));
        }
        let total: f64 = histogram.iter().sum();
        if total <= 0.0 {
            return Err(MatrixError::InvalidHistogram("zero total mass".into()));
        }
        let points = params.points.unwrap_or(total);
        if !points.is_finite() || points <= 0.0 {
            return Err(MatrixError::InvalidHistogram(format!(
                "point count must be positive, got {points}"
            )));
        }
        let circular = params.circular;

        let masses = vector_to_intervals(&cumulate(&histogram), circular, total);
        let probabilities = match &params.ground_pdf {
            Some(pdf) => {
                let pdf = to_masses(pdf, "ground pdf bin")?;
                if pdf.len() != len {
                    return Err(MatrixError::InvalidHistogram(format!(
                        "ground pdf has {} bins, histogram has {len}",
                        pdf.len()
                    )));
                }
                let mass: f64 = pdf.iter().sum();
                if mass <= 0.0 {
                    return Err(MatrixError::InvalidHistogram("ground pdf has zero mass".into()));
                }
                let pdf: Vec<f64> = pdf.iter().map(|v| v / mass).collect();
                Some(vector_to_intervals(&cumulate(&pdf), circular, 1.0))
            }
            None => None,
        };

        let h = entropy_fct(points, params.mu, params.sigma2);
        let mut hmod = IntervalMatrix::zeros(len, circular);
        let mut hgap = IntervalMatrix::zeros(len, circular);
        for (a, w) in masses.arcs() {
            if w == len {
                continue;
            }
            let r = (masses.at(a, w) / total).clamp(0.0, 1.0);
            let p = match &probabilities {
                Some(pdf) => pdf.at(a, w).clamp(0.0, 1.0),
                None => w as f64 / len as f64,
            };
            hmod.set_at(a, w, h(r, p));
            hgap.set_at(a, w, h(1.0 - r, 1.0 - p));
        }

        let threshold = get_threshold(len, points, params.eps, circular);
        debug!(
            "histogram analysis: bins={}, mass={}, points={}, circular={}, model={:?}, threshold={}",
            len,
            total,
            points,
            circular,
            NullModel::from_moments(params.mu, params.sigma2),
            threshold
        );

        Ok(Self {
            histogram,
            hmod,
            hgap,
            threshold,
        })
    }

    fn modes(&self) -> Vec<Mode> {
        let hmod = suppress_containing(&self.hmod, &self.hgap, self.threshold);
        select_intervals(&hmod, self.threshold, &self.histogram)
    }

    fn gaps(&self) -> Vec<Mode> {
        let hgap = suppress_containing(&self.hgap, &self.hmod, self.threshold);
        select_intervals(&hgap, self.threshold, &self.histogram)
    }
}

fn to_masses<T: ToPrimitive + Copy>(values: &[T], what: &str) -> Result<Vec<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| match v.to_f64() {
            Some(x) if x.is_finite() && x >= 0.0 => Ok(x),
            Some(x) => Err(MatrixError::InvalidHistogram(format!(
                "{what} {i} must be finite and non-negative, got {x}"
            ))),
            None => Err(MatrixError::InvalidHistogram(format!(
                "{what} {i} is not representable as f64"
            ))),
        })
        .collect()
}

/// Maximal meaningful modes and gaps of `histogram`.
///
/// # Errors
/// [`MatrixError::InvalidHistogram`] if the histogram is empty, has a negative or
/// non-finite bin, or has no mass; if `params.points` is not positive; or if
/// `params.ground_pdf` does not match the histogram length or has no mass.
pub fn get_modes_and_gaps<T: ToPrimitive + Copy>(
    histogram: &[T],
    params: &ModeParams,
) -> Result<ModesAndGaps> {
    let analysis = Analysis::new(histogram, params)?;
    let found = ModesAndGaps {
        modes: analysis.modes(),
        gaps: analysis.gaps(),
    };
    debug!(
        "histogram analysis: {} modes, {} gaps",
        found.modes.len(),
        found.gaps.len()
    );
    Ok(found)
}

/// Maximal meaningful modes of `histogram`, most significant first.
pub fn get_modes<T: ToPrimitive + Copy>(histogram: &[T], params: &ModeParams) -> Result<Vec<Mode>> {
    let modes = Analysis::new(histogram, params)?.modes();
    debug!("histogram analysis: {} modes", modes.len());
    Ok(modes)
}

/// Maximal meaningful gaps of `histogram`, most significant first.
pub fn get_gaps<T: ToPrimitive + Copy>(histogram: &[T], params: &ModeParams) -> Result<Vec<Mode>> {
    let gaps = Analysis::new(histogram, params)?.gaps();
    debug!("histogram analysis: {} gaps", gaps.len());
    Ok(gaps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_histogram_has_no_modes() {
        let modes = get_modes(&[1.0; 8], &ModeParams::default()).unwrap();
        assert!(modes.is_empty());
        let gaps = get_gaps(&[1.0; 8], &ModeParams::default()).unwrap();
        assert!(gaps.is_empty());
    }

    #[test]
    fn test_single_peak() {
        let hist = [1.0, 1.0, 1.0, 50.0, 50.0, 1.0, 1.0, 1.0];
        let modes = get_modes(&hist, &ModeParams::default()).unwrap();
        assert_eq!(modes.len(), 1);
        assert_eq!(modes[0].bins(), [3, 4]);
        assert_relative_eq!(modes[0].phase(), 3.5 / 8.0, epsilon = 1e-12);
        assert_eq!(modes[0].norm(), Some(100.0));
    }

    #[test]
    fn test_integer_histogram() {
        let hist = [1u16, 1, 1, 50, 50, 1, 1, 1];
        let modes = get_modes(&hist, &ModeParams::default()).unwrap();
        assert_eq!(modes[0].bins(), [3, 4]);
    }

    #[test]
    fn test_gap_between_peaks() {
        let hist = [30.0, 30.0, 0.0, 0.0, 0.0, 0.0, 30.0, 30.0];
        let found = get_modes_and_gaps(&hist, &ModeParams::default()).unwrap();
        assert!(!found.gaps.is_empty());
        let gap = &found.gaps[0];
        for bin in 2..6 {
            assert!(gap.contains(bin), "gap {gap} misses bin {bin}");
        }
        assert!(!gap.contains(0) && !gap.contains(7));
    }

    #[test]
    fn test_circular_mode_wraps() {
        let hist = [40.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 40.0];
        let params = ModeParams::default().with_circular(true);
        let modes = get_modes(&hist, &params).unwrap();
        assert_eq!(modes[0].bins(), [7, 0]);
        assert_relative_eq!(modes[0].phase(), 7.5 / 8.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ground_pdf_matching_histogram() {
        let hist = [1.0, 1.0, 1.0, 50.0, 50.0, 1.0, 1.0, 1.0];
        let params = ModeParams::default().with_ground_pdf(hist.to_vec());
        let found = get_modes_and_gaps(&hist, &params).unwrap();
        assert!(found.modes.is_empty());
        assert!(found.gaps.is_empty());
    }

    #[test]
    fn test_eps_raises_the_bar() {
        let hist = [5.0, 5.0, 9.0, 5.0, 5.0];
        let loose = get_modes(&hist, &ModeParams::default().with_eps(-2.0)).unwrap();
        let strict = get_modes(&hist, &ModeParams::default().with_eps(3.0)).unwrap();
        assert!(strict.len() <= loose.len());
        assert!(strict.is_empty());
    }

    #[test]
    fn test_gaussian_model_runs() {
        let hist = [1.0, 1.0, 1.0, 50.0, 50.0, 1.0, 1.0, 1.0];
        let params = ModeParams::default().with_gaussian(1.0, 0.25);
        let modes = get_modes(&hist, &params).unwrap();
        assert!(modes.iter().any(|m| m.contains(3) && m.contains(4)));
    }

    #[test]
    fn test_invalid_inputs() {
        let empty: [f64; 0] = [];
        assert!(matches!(
            get_modes(&empty, &ModeParams::default()),
            Err(MatrixError::InvalidHistogram(_))
        ));
        assert!(get_modes(&[1.0, -1.0], &ModeParams::default()).is_err());
        assert!(get_modes(&[1.0, f64::NAN], &ModeParams::default()).is_err());
        assert!(get_modes(&[0.0, 0.0], &ModeParams::default()).is_err());
        assert!(get_modes(&[1.0, 2.0], &ModeParams::default().with_points(0.0)).is_err());
        assert!(get_modes(
            &[1.0, 2.0],
            &ModeParams::default().with_ground_pdf(vec![1.0])
        )
        .is_err());
        assert!(get_modes(
            &[1.0, 2.0],
            &ModeParams::default().with_ground_pdf(vec![0.0, 0.0])
        )
        .is_err());
    }

    #[test]
    fn test_single_bin() {
        assert!(get_modes(&[3.0], &ModeParams::default()).unwrap().is_empty());
        assert!(get_modes(&[3.0], &ModeParams::default().with_circular(true))
            .unwrap()
            .is_empty());
    }
}
