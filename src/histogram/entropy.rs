//! Interval significance under a null model, and the significance threshold.
//!
//! The significance of an interval holding a fraction `r` of the mass where the null
//! model expects `p` is `-log10(P) / M`, `P` being the probability of observing at
//! least `r` under the null model. An interval is meaningful when that value reaches
//! `(log10(N) + eps) / M`, `N` being the number of tested intervals.

use std::f64::consts::{LN_10, SQRT_2};

use super::special::ln_erfc;

/// Probabilities below this are treated as zero.
const TINY: f64 = 1e-12;

/// Distribution of the mass carried by each counted point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NullModel {
    /// Every point carries unit mass.
    Uniform,
    /// Point masses are Gaussian with mean `mu` and variance `sigma2`.
    Gaussian { mu: f64, sigma2: f64 },
}

impl NullModel {
    /// Gaussian when both moments are given with `mu > 0` and `sigma2 > 0`.
    pub fn from_moments(mu: Option<f64>, sigma2: Option<f64>) -> Self {
        match (mu, sigma2) {
            (Some(mu), Some(sigma2))
                if mu.is_finite() && sigma2.is_finite() && mu > 0.0 && sigma2 > 0.0 =>
            {
                NullModel::Gaussian { mu, sigma2 }
            }
            _ => NullModel::Uniform,
        }
    }
}

/// Build the entropy function `(r, p) -> significance` for `points` counted points.
///
/// Only excesses count: the function is zero when `r <= p`. Deficits are measured by
/// calling it with `(1 - r, 1 - p)`.
pub fn entropy_fct(points: f64, mu: Option<f64>, sigma2: Option<f64>) -> impl Fn(f64, f64) -> f64 {
    let model = NullModel::from_moments(mu, sigma2);
    move |r, p| match model {
        NullModel::Uniform => uniform_entropy(r, p),
        NullModel::Gaussian { mu, sigma2 } => gaussian_entropy(points, mu, sigma2, r, p),
    }
}

/// Binary Kullback-Leibler divergence `KL(r || p)` in base 10.
fn uniform_entropy(r: f64, p: f64) -> f64 {
    if r <= p || p < TINY {
        return 0.0;
    }
    if r >= 1.0 {
        return -p.log10();
    }
    (r * (r / p).ln() + (1.0 - r) * ((1.0 - r) / (1.0 - p)).ln()) / LN_10
}

/// Gaussian tail of the observed mass `r * M * mu` against the expected `p * M * mu`.
fn gaussian_entropy(points: f64, mu: f64, sigma2: f64, r: f64, p: f64) -> f64 {
    if p < TINY {
        return 0.0;
    }
    let expected = p * points * mu;
    let observed = r * points * mu;
    if observed <= expected {
        return 0.0;
    }
    let variance = expected * (mu * (1.0 - p) + sigma2 / mu);
    let z = (observed - expected) / variance.sqrt();
    (0.5f64.ln() + ln_erfc(z / SQRT_2)) / (-points * LN_10)
}

/// Number of intervals tested: `L(L-1)` circular, `L(L-1)/2` linear, at least one.
pub fn interval_count(len: usize, circular: bool) -> usize {
    let n = len * len.saturating_sub(1);
    let n = if circular { n } else { n / 2 };
    n.max(1)
}

/// Significance threshold for `len` bins, `points` points and `eps = -log10(NFA)`.
pub fn get_threshold(len: usize, points: f64, eps: f64, circular: bool) -> f64 {
    ((interval_count(len, circular) as f64).log10() + eps) / points
}
