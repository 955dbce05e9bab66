//! Path-length arithmetic for isolation trees.
//!
//! An isolation tree separates points with random axis-aligned splits. Points
//! that end up isolated after few splits are unusual. The functions here turn a
//! raw path length into a normalized anomaly score:
//!
//! - `c(n)`: expected path length of an unsuccessful search in a binary search
//!   tree of `n` nodes, used both to normalize and to extend truncated paths.
//! - `s(x) = 2^(-E[h(x)] / c(ψ))`: anomaly score in (0, 1]. Scores near 1 are
//!   anomalous, scores well below 0.5 are ordinary.

/// Euler–Mascheroni constant.
pub const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Harmonic number H(n), exact below 64 and asymptotic above.
pub fn harmonic_number(n: u64) -> f64 {
    if n == 0 {
        return 0.0;
    }
    if n < 64 {
        return (1..=n).map(|k| 1.0 / k as f64).sum();
    }
    let x = n as f64;
    x.ln() + EULER_GAMMA + 1.0 / (2.0 * x) - 1.0 / (12.0 * x * x)
}

/// Average path length `c(n)` of an unsuccessful BST search over `n` points.
///
/// `c(0) = c(1) = 0`, `c(2) = 1`, and `c(n) = 2 H(n-1) - 2 (n-1) / n` beyond.
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as u64;
            2.0 * harmonic_number(n - 1) - 2.0 * (n - 1) as f64 / n as f64
        }
    }
}

/// Height limit used when growing a tree on `sample_size` points.
pub fn height_limit(sample_size: usize) -> usize {
    if sample_size <= 1 {
        return 0;
    }
    (sample_size as f64).log2().ceil() as usize
}

/// Normalized anomaly score from a mean path length.
///
/// Returns 1.0 for degenerate samples (`c(ψ) = 0`), where every point is
/// equally isolated.
pub fn anomaly_score(mean_path_length: f64, sample_size: usize) -> f64 {
    let c = average_path_length(sample_size);
    if c <= 0.0 || mean_path_length.is_nan() {
        return 1.0;
    }
    2f64.powf(-mean_path_length / c)
}
