/// Lower bound applied when the caller has none of its own.
pub const DEFAULT_MIN: Option<f64> = Some(0.0);

/// Returns `x` if it is present, finite and inside `[min_value, max_value]`,
/// `fallback` otherwise. Missing bounds are not checked.
pub fn validate(x: Option<f64>, fallback: f64, min_value: Option<f64>, max_value: Option<f64>) -> f64 {
    let Some(x) = x else {
        return fallback;
    };
    if !x.is_finite() {
        return fallback;
    }
    if min_value.is_some_and(|min| x < min) {
        return fallback;
    }
    if max_value.is_some_and(|max| x > max) {
        return fallback;
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_in_range_pass_through() {
        for x in [0.0, 0.5, 12.25, 99.0, 100.0] {
            assert_eq!(validate(Some(x), -1.0, DEFAULT_MIN, Some(100.0)), x);
        }
        assert_eq!(validate(Some(-5.0), 0.0, Some(-10.0), None), -5.0);
        assert_eq!(validate(Some(1e300), 0.0, None, None), 1e300);
    }

    #[test]
    fn test_non_finite_values_fall_back() {
        for x in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(validate(Some(x), -1.0, None, None), -1.0);
            assert_eq!(validate(Some(x), 0.0, DEFAULT_MIN, Some(10.0)), 0.0);
        }
    }

    #[test]
    fn test_out_of_range_and_missing_values_fall_back() {
        assert_eq!(validate(Some(-0.001), -1.0, DEFAULT_MIN, None), -1.0);
        assert_eq!(validate(Some(640.5), -1.0, DEFAULT_MIN, Some(640.0)), -1.0);
        assert_eq!(validate(None, 7.0, DEFAULT_MIN, None), 7.0);
    }
}
