//! Fixed-precision rounding for configuration strings
//!
//! Every number written into a viewer attribute goes through
//! [`round_to_digits`] first, so repeated edits of the same value produce
//! byte-identical strings.

/// Number of decimal places kept when serializing camera values
pub const DIGITS: u32 = 4;

/// Round `value` to `digits` decimal places, halves away from zero.
///
/// Non-finite inputs are returned unchanged, as are values too large to be
/// scaled without overflowing (they have no fractional part to round).
pub fn round_to_digits(value: f64, digits: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(digits as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// Print a number the way the attribute grammar expects it: integral values
/// without a trailing `.0`, no negative zero, and `Infinity` spelled out.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_four_digits() {
        assert_eq!(round_to_digits(1.23456, 4), 1.2346);
        assert_eq!(round_to_digits(-1.23454, 4), -1.2345);
        assert_eq!(round_to_digits(33.0, 4), 33.0);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_to_digits(2.5, 0), 3.0);
        assert_eq!(round_to_digits(-2.5, 0), -3.0);
        assert_eq!(round_to_digits(0.125, 2), 0.13);
    }

    #[test]
    fn test_round_is_total() {
        assert!(round_to_digits(f64::NAN, 4).is_nan());
        assert_eq!(round_to_digits(f64::INFINITY, 4), f64::INFINITY);
        assert_eq!(round_to_digits(1e305, 4), 1e305);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(33.0), "33");
        assert_eq!(format_number(12.3457), "12.3457");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-45.5), "-45.5");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }
}
