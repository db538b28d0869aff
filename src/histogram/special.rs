//! Complementary error function.
//!
//! Chebyshev fit of `erfc(x) = t * exp(-x^2 + P(t))`, `t = 1 / (1 + x/2)`, with a
//! relative error below `1.2e-7` over the whole real line. The logarithmic form keeps
//! full precision in the far tail where `erfc` itself underflows.

const COEFFS: [f64; 10] = [
    -1.265_512_23,
    1.000_023_68,
    0.374_091_96,
    0.096_784_18,
    -0.186_288_06,
    0.278_868_07,
    -1.135_203_98,
    1.488_515_87,
    -0.822_152_23,
    0.170_872_77,
];

/// `ln(erfc(x))` for `x >= 0`.
fn ln_erfc_nonneg(x: f64) -> f64 {
    let t = 1.0 / (1.0 + 0.5 * x);
    let poly = COEFFS.iter().rev().fold(0.0, |acc, &c| acc * t + c);
    t.ln() - x * x + poly
}

/// Natural logarithm of the complementary error function.
pub fn ln_erfc(x: f64) -> f64 {
    if x >= 0.0 {
        ln_erfc_nonneg(x)
    } else {
        (2.0 - ln_erfc_nonneg(-x).exp()).ln()
    }
}

/// Complementary error function.
pub fn erfc(x: f64) -> f64 {
    if x >= 0.0 {
        ln_erfc_nonneg(x).exp()
    } else {
        2.0 - ln_erfc_nonneg(-x).exp()
    }
}
