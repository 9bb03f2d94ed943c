//! Numeric field coercion.

/// Raw values that always mean "no measurement".
pub const MISSING_SENTINELS: [&str; 3] = ["", "NA", "NaN"];

/// Convert a raw field value to a number.
///
/// Returns `None` (missing) for an absent field, a sentinel value, or
/// anything that does not parse. Surrounding whitespace is ignored by
/// the parse but not by the sentinel check.
pub fn coerce_numeric(raw: Option<&str>) -> Option<f64> {
    let raw = raw?;
    if MISSING_SENTINELS.contains(&raw) {
        return None;
    }
    raw.trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_are_missing() {
        assert_eq!(coerce_numeric(None), None);
        assert_eq!(coerce_numeric(Some("")), None);
        assert_eq!(coerce_numeric(Some("NA")), None);
        assert_eq!(coerce_numeric(Some("NaN")), None);
    }

    #[test]
    fn test_unparsable_is_missing() {
        assert_eq!(coerce_numeric(Some("n/a")), None);
        assert_eq!(coerce_numeric(Some("abc")), None);
        assert_eq!(coerce_numeric(Some("39.1mm")), None);
        assert_eq!(coerce_numeric(Some("   ")), None);
    }

    #[test]
    fn test_parses_without_rounding() {
        assert_eq!(coerce_numeric(Some("39.1")), Some(39.1));
        assert_eq!(coerce_numeric(Some("3750")), Some(3750.0));
        assert_eq!(coerce_numeric(Some("-2.125")), Some(-2.125));
        assert_eq!(coerce_numeric(Some("1e3")), Some(1000.0));
        assert_eq!(coerce_numeric(Some(" 42.5 ")), Some(42.5));
    }

    #[test]
    fn test_sentinel_match_is_exact() {
        // Lowercase "na" is not a sentinel but still fails to parse.
        assert_eq!(coerce_numeric(Some("na")), None);
        assert_eq!(coerce_numeric(Some(" NA ")), None);
    }
}
