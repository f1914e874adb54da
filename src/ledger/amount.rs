//! Lenient parsing for user-entered amounts.
//!
//! Form input arrives as free text in either `12.50` or `12,50` notation. Anything that does
//! not parse to a finite number yields `None`; each caller decides its own fallback.

/// Parses a locale-flexible amount, accepting `,` or `.` as the decimal separator.
pub fn parse_amount_lenient(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parses an amount, substituting `0` for unparseable input.
pub fn amount_or_zero(raw: &str) -> f64 {
    parse_amount_lenient(raw).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_comma_and_dot_separators() {
        assert_eq!(parse_amount_lenient("12,5"), Some(12.5));
        assert_eq!(parse_amount_lenient("12.5"), Some(12.5));
        assert_eq!(parse_amount_lenient("  3000 "), Some(3000.0));
        assert_eq!(parse_amount_lenient("-42"), Some(-42.0));
    }

    #[test]
    fn rejects_garbage_and_non_finite_values() {
        assert_eq!(parse_amount_lenient(""), None);
        assert_eq!(parse_amount_lenient("abc"), None);
        assert_eq!(parse_amount_lenient("1,234.50"), None);
        assert_eq!(parse_amount_lenient("NaN"), None);
        assert_eq!(parse_amount_lenient("inf"), None);
    }

    #[test]
    fn amount_or_zero_falls_back() {
        assert_eq!(amount_or_zero("oops"), 0.0);
        assert_eq!(amount_or_zero("7,25"), 7.25);
    }
}
