//! Numeric conversion helpers centralizing rounding, clamping, and parsing.

use num_traits::cast::cast;

/// Round to a fixed number of decimal places, returning 0.0 for non-finite values.
#[must_use]
pub fn round_to(value: f64, places: u8) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10_f64.powi(i32::from(places));
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() { rounded } else { value }
}

/// Clamp into an inclusive range without panicking on inverted or NaN bounds.
///
/// `f64::clamp` asserts `min <= max`; catalog ranges come from user-editable
/// documents, so an inverted pair resolves to the lower bound winning.
#[must_use]
pub fn clamp_to_range(value: f64, min: f64, max: f64) -> f64 {
    let mut clamped = value;
    if max.is_finite() && clamped > max {
        clamped = max;
    }
    if min.is_finite() && clamped < min {
        clamped = min;
    }
    clamped
}

/// Parse a user-entered number, accepting a comma as the decimal separator.
///
/// Returns `None` for empty input, garbage, and non-finite spellings such as `inf`.
#[must_use]
pub fn parse_locale_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = trimmed.replacen(',', ".", 1);
    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Round a non-negative f64 count to u32, returning 0 for NaN or negative values.
#[must_use]
pub fn round_f64_to_u32(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    let max = cast::<u32, f64>(u32::MAX).unwrap_or(f64::MAX);
    cast::<f64, u32>(value.min(max).round()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_handles_places_and_non_finite() {
        assert!((round_to(1004.184_1, 1) - 1004.2).abs() < f64::EPSILON);
        assert!((round_to(0.301_49, 3) - 0.301).abs() < f64::EPSILON);
        assert!((round_to(f64::NAN, 2) - 0.0).abs() < f64::EPSILON);
        assert!((round_to(f64::INFINITY, 1) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn clamp_tolerates_inverted_bounds() {
        assert!((clamp_to_range(5.0, 0.0, 3.0) - 3.0).abs() < f64::EPSILON);
        assert!((clamp_to_range(-1.0, 0.0, 3.0) - 0.0).abs() < f64::EPSILON);
        assert!((clamp_to_range(2.0, 4.0, 1.0) - 4.0).abs() < f64::EPSILON);
        assert!((clamp_to_range(2.0, f64::NAN, f64::NAN) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parses_comma_decimals() {
        assert_eq!(parse_locale_number(" 0,3 "), Some(0.3));
        assert_eq!(parse_locale_number("65"), Some(65.0));
        assert_eq!(parse_locale_number("abc"), None);
        assert_eq!(parse_locale_number("inf"), None);
        assert_eq!(parse_locale_number("   "), None);
    }

    #[test]
    fn counts_round_safely() {
        assert_eq!(round_f64_to_u32(5.6), 6);
        assert_eq!(round_f64_to_u32(-3.0), 0);
        assert_eq!(round_f64_to_u32(f64::NAN), 0);
    }
}
