//! Maximal meaningful interval selection.
//!
//! Every pass is an interval dynamic program over `(start, width)` arcs. An arc of
//! width `w` contains exactly two arcs of width `w - 1` (drop the first or the last
//! bin), and every arc it contains is reached through a chain of such drops. The same
//! holds for circular arcs since the full circle is excluded, so the sweeps are exact in
//! both topologies.

use super::intervals::IntervalMatrix;
use super::mode::Mode;

/// An interval is meaningful when its significance is positive and reaches `threshold`.
#[inline]
pub fn is_meaningful(h: f64, threshold: f64) -> bool {
    h > 0.0 && h >= threshold
}

/// For every interval, the largest value over the intervals it contains (itself
/// included). Swept from the shortest intervals to the longest.
pub fn max_inf(h: &IntervalMatrix) -> IntervalMatrix {
    let len = h.len();
    let mut inf = IntervalMatrix::zeros(len, h.is_circular());
    for (a, w) in h.arcs() {
        let mut best = h.at(a, w);
        if w > 1 {
            best = best
                .max(inf.at(a, w - 1))
                .max(inf.at((a + 1) % len, w - 1));
        }
        inf.set_at(a, w, best);
    }
    inf
}

/// For every interval, the largest value over the intervals containing it (itself
/// included). Swept from the longest intervals to the shortest.
pub fn max_sup(h: &IntervalMatrix) -> IntervalMatrix {
    let len = h.len();
    let circular = h.is_circular();
    let max_width = h.max_width();
    let mut sup = IntervalMatrix::zeros(len, circular);
    let arcs: Vec<_> = h.arcs().collect();
    for &(a, w) in arcs.iter().rev() {
        let mut best = h.at(a, w);
        if w < max_width {
            if circular {
                best = best
                    .max(sup.at(a, w + 1))
                    .max(sup.at((a + len - 1) % len, w + 1));
            } else {
                if a + w < len {
                    best = best.max(sup.at(a, w + 1));
                }
                if a > 0 {
                    best = best.max(sup.at(a - 1, w + 1));
                }
            }
        }
        sup.set_at(a, w, best);
    }
    sup
}

/// Copy of `target` with every interval cleared that contains a meaningful interval
/// of `other`.
///
/// Used both ways: modes nesting a meaningful gap are dropped, and gaps nesting a
/// meaningful mode are dropped.
pub fn suppress_containing(
    target: &IntervalMatrix,
    other: &IntervalMatrix,
    threshold: f64,
) -> IntervalMatrix {
    let nested = max_inf(other);
    let mut out = target.clone();
    for (a, w) in nested.arcs() {
        if is_meaningful(nested.at(a, w), threshold) {
            out.set_at(a, w, 0.0);
        }
    }
    out
}

/// Maximal meaningful intervals of `h`, most significant first.
///
/// An interval is kept when it is meaningful and no interval containing it or
/// contained in it is strictly more significant. `histogram` weights the
/// reported mass and barycenter.
pub fn select_intervals(h: &IntervalMatrix, threshold: f64, histogram: &[f64]) -> Vec<Mode> {
    let len = h.len();
    let inf = max_inf(h);
    let sup = max_sup(h);
    let mut modes: Vec<Mode> = h
        .arcs()
        .filter_map(|(a, w)| {
            let value = h.at(a, w);
            let keep = is_meaningful(value, threshold)
                && inf.at(a, w) <= value
                && sup.at(a, w) <= value;
            keep.then(|| Mode::new([a, h.end_of(a, w)], value, len, Some(histogram)))
        })
        .collect();
    modes.sort_by(Mode::compar);
    modes
}
