//! Rounding and clipping helpers for persisted values.

/// Round half away from zero to `decimals` places.
///
/// NaN and infinities pass through unchanged.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(decimals as i32);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / scale
}

/// Clamp into `[lo, hi]`. NaN maps to `lo`.
pub fn clip(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        return lo;
    }
    value.max(lo).min(hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_basic() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(-1.235, 1), -1.2);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
    }

    #[test]
    fn round_to_non_finite_passthrough() {
        assert!(round_to(f64::NAN, 2).is_nan());
        assert_eq!(round_to(f64::INFINITY, 2), f64::INFINITY);
    }

    #[test]
    fn clip_bounds() {
        assert_eq!(clip(1.7, 0.0, 1.0), 1.0);
        assert_eq!(clip(-0.2, 0.0, 1.0), 0.0);
        assert_eq!(clip(0.42, 0.0, 1.0), 0.42);
        assert_eq!(clip(f64::NAN, 0.1, 0.9), 0.1);
    }
}
