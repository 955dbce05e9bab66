//! Property-based tests for rp-math numerical functions.
//!
//! Uses proptest to verify mathematical properties hold across many random inputs.

use proptest::prelude::*;
use rp_math::{anomaly_score, average_path_length, clip, mean, min_max, quantile, round_to};

/// Tolerance for floating point comparisons.
const TOL: f64 = 1e-9;

// ============================================================================
// quantile properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Quantiles stay within the data range.
    #[test]
    fn quantile_bounded(values in prop::collection::vec(-1e6..1e6f64, 1..200), q in 0.0..=1.0f64) {
        let out = quantile(&values, q);
        let (lo, hi) = min_max(&values).unwrap();
        prop_assert!(out >= lo - TOL && out <= hi + TOL, "q={} out={} not in [{}, {}]", q, out, lo, hi);
    }

    /// Quantile is monotone in q.
    #[test]
    fn quantile_monotone(values in prop::collection::vec(-1e3..1e3f64, 2..100), a in 0.0..=1.0f64, b in 0.0..=1.0f64) {
        let (q1, q2) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(quantile(&values, q1) <= quantile(&values, q2) + TOL);
    }

    /// At most a (1 - q) share of values lies strictly above the q-quantile.
    #[test]
    fn quantile_tail_share(values in prop::collection::vec(-1e3..1e3f64, 20..300), q in 0.5..0.99f64) {
        let t = quantile(&values, q);
        let above = values.iter().filter(|v| **v > t).count();
        let bound = ((1.0 - q) * values.len() as f64).ceil() as usize + 1;
        prop_assert!(above <= bound, "{} above threshold, bound {}", above, bound);
    }

    /// Mean lies between min and max.
    #[test]
    fn mean_bounded(values in prop::collection::vec(-1e6..1e6f64, 1..200)) {
        let m = mean(&values);
        let (lo, hi) = min_max(&values).unwrap();
        prop_assert!(m >= lo - 1e-6 && m <= hi + 1e-6);
    }
}

// ============================================================================
// isolation path-length properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// c(n) grows with n.
    #[test]
    fn average_path_length_monotone(n in 2usize..100_000) {
        prop_assert!(average_path_length(n + 1) > average_path_length(n));
    }

    /// Scores live in (0, 1] and shrink as paths grow.
    #[test]
    fn anomaly_score_range_and_order(depth in 0.0..50.0f64, extra in 0.1..10.0f64, n in 2usize..4096) {
        let s1 = anomaly_score(depth, n);
        let s2 = anomaly_score(depth + extra, n);
        prop_assert!(s1 > 0.0 && s1 <= 1.0);
        prop_assert!(s2 < s1);
    }
}

// ============================================================================
// rounding / clipping
// ============================================================================

proptest! {
    #[test]
    fn round_to_is_close(v in -1e6..1e6f64, d in 0u32..6) {
        let r = round_to(v, d);
        prop_assert!((r - v).abs() <= 0.5 * 10f64.powi(-(d as i32)) + 1e-9);
    }

    #[test]
    fn round_to_idempotent(v in -1e6..1e6f64, d in 0u32..6) {
        let r = round_to(v, d);
        prop_assert_eq!(round_to(r, d), r);
    }

    #[test]
    fn clip_within_bounds(v in -10.0..10.0f64, lo in -1.0..0.0f64, hi in 0.0..1.0f64) {
        let c = clip(v, lo, hi);
        prop_assert!(c >= lo && c <= hi);
    }
}
