//! Set-similarity measures and the numeric bounds CPMerge prunes on.
//!
//! Each measure is a value (not a trait object, per the hot-path call
//! pattern of `min_common_features`/`similarity` once per candidate), so
//! dispatch is a plain `match` rather than a vtable indirection.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::feature::FeatureSet;

/// Lower clamp for the similarity threshold `alpha`, per the configuration
/// surface's `alpha: float in (0,1]` with a floor of `0.01`.
pub const ALPHA_MIN: f64 = 0.01;
pub const ALPHA_MAX: f64 = 1.0;

/// Clamp `alpha` into `[ALPHA_MIN, ALPHA_MAX]`.
pub fn clamp_alpha(alpha: f64) -> f64 {
    alpha.clamp(ALPHA_MIN, ALPHA_MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Similarity {
    Cosine,
    Dice,
    #[default]
    Jaccard,
    Overlap,
    Exact,
    Hamming,
}

impl Similarity {
    /// Smallest candidate feature-set size worth probing for a query of
    /// `a` features at threshold `alpha`.
    pub fn min_features(&self, a: usize, alpha: f64) -> usize {
        if let Similarity::Exact = self {
            return a;
        }
        let af = a as f64;
        let v = match self {
            Similarity::Cosine => (alpha * alpha * af).ceil(),
            Similarity::Dice => (alpha / (2.0 - alpha) * af).ceil(),
            Similarity::Jaccard | Similarity::Overlap | Similarity::Hamming => (alpha * af).ceil(),
            Similarity::Exact => unreachable!(),
        };
        v as usize
    }

    /// Largest candidate feature-set size worth probing.
    pub fn max_features(&self, a: usize, alpha: f64) -> usize {
        if let Similarity::Exact = self {
            return a;
        }
        let af = a as f64;
        let v = match self {
            Similarity::Cosine => (af / (alpha * alpha)).floor(),
            Similarity::Dice => ((2.0 - alpha) * af / alpha).floor(),
            Similarity::Jaccard | Similarity::Overlap | Similarity::Hamming => (af / alpha).floor(),
            Similarity::Exact => unreachable!(),
        };
        v as usize
    }

    /// Minimum number of shared features (`tau`) a candidate of size `b`
    /// must have with a query of size `a` to possibly meet `alpha`.
    ///
    /// A `b` right at `max_features(a, alpha)` makes the exact threshold
    /// land on an integer (the best a candidate of that size could ever
    /// do is match every query feature, hitting `alpha` precisely); an
    /// epsilon guards `ceil` against floating-point noise nudging that
    /// integer up by one and over-pruning a legitimate candidate.
    pub fn min_common_features(&self, a: usize, b: usize, alpha: f64) -> i64 {
        if let Similarity::Exact = self {
            // Exact requires the sets to be identical, so the candidate must
            // match every feature of the larger set, with no `min(a, b)`
            // clamp applying (that clamp is for the asymmetric measures).
            return a.max(b) as i64;
        }
        const EPSILON: f64 = 1e-9;
        let (af, bf) = (a as f64, b as f64);
        let v = match self {
            Similarity::Cosine => (alpha * (af * bf).sqrt() - EPSILON).ceil(),
            Similarity::Dice => (0.5 * alpha * (af + bf) - EPSILON).ceil(),
            Similarity::Jaccard => (alpha * (af + bf) / (1.0 + alpha) - EPSILON).ceil(),
            Similarity::Overlap => (alpha * af.min(bf) - EPSILON).ceil(),
            Similarity::Hamming => (alpha * (af + bf) - EPSILON).ceil(),
            Similarity::Exact => unreachable!(),
        };
        (v as i64).min(a.min(b) as i64)
    }

    /// Compute the similarity of two already-extracted feature sets.
    pub fn similarity(&self, a: &FeatureSet, b: &FeatureSet) -> f64 {
        let sa: HashSet<&str> = a.iter().map(String::as_str).collect();
        let sb: HashSet<&str> = b.iter().map(String::as_str).collect();
        let inter = sa.intersection(&sb).count() as f64;

        match self {
            Similarity::Cosine => inter / ((sa.len() as f64) * (sb.len() as f64)).sqrt(),
            Similarity::Dice => 2.0 * inter / (sa.len() + sb.len()) as f64,
            Similarity::Jaccard => {
                let union = sa.union(&sb).count() as f64;
                inter / union
            }
            Similarity::Overlap => inter / sa.len().min(sb.len()) as f64,
            Similarity::Exact => {
                if sa == sb {
                    1.0
                } else {
                    0.0
                }
            }
            Similarity::Hamming => {
                let sym_diff = sa.symmetric_difference(&sb).count() as f64;
                sym_diff
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fs(items: &[&str]) -> FeatureSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn symmetry_holds_for_all_measures() {
        let a = fs(&["a", "b", "c"]);
        let b = fs(&["b", "c", "d", "e"]);
        for m in [
            Similarity::Cosine,
            Similarity::Dice,
            Similarity::Jaccard,
            Similarity::Overlap,
            Similarity::Exact,
            Similarity::Hamming,
        ] {
            assert_eq!(m.similarity(&a, &b), m.similarity(&b, &a), "{m:?} not symmetric");
        }
    }

    #[test]
    fn bound_consistency() {
        for m in [
            Similarity::Cosine,
            Similarity::Dice,
            Similarity::Jaccard,
            Similarity::Overlap,
            Similarity::Exact,
            Similarity::Hamming,
        ] {
            for alpha_milli in 1..=100 {
                let alpha = alpha_milli as f64 / 100.0;
                for a in 1..20usize {
                    let lo = m.min_features(a, alpha);
                    let hi = m.max_features(a, alpha);
                    assert!(lo <= a, "{m:?} min_features({a},{alpha}) = {lo} > a");
                    if let Similarity::Exact = m {
                        assert_eq!(hi, a, "Exact max_features({a},{alpha}) must equal a");
                    } else {
                        assert!(a <= hi, "{m:?} max_features({a},{alpha}) = {hi} < a");
                    }
                    let tau = m.min_common_features(a, hi.max(1), alpha);
                    assert!(tau >= 1, "{m:?} tau={tau} < 1 for a={a} alpha={alpha}");
                    assert!(tau <= a as i64, "{m:?} tau={tau} > a={a}");
                }
            }
        }
    }

    #[test]
    fn jaccard_known_value() {
        let a = fs(&["ace", "cet"]);
        let b = fs(&["ace", "cet", "eto", "ton", "one", "tat", "ate"]);
        let j = Similarity::Jaccard.similarity(&a, &b);
        assert!((j - 2.0 / 7.0).abs() < 1e-9);
    }
}
