/// Shared text helpers for reading IBGE spreadsheet cells
///
/// Check whether a cell's text looks like a year label
///
/// Year labels in the series are sometimes typed with thousands separators or
/// come through as floats. After dropping `.` and `,` the text must be all
/// digits and at least 4 characters long.
///
/// # Examples
///
/// ```
/// use ipca_normalizer::utils::is_year_token;
///
/// assert!(is_year_token("1994"));
/// assert!(is_year_token(" 1.994 "));
/// assert!(is_year_token("1994.0"));
/// assert!(!is_year_token("94"));
/// assert!(!is_year_token("JAN"));
/// assert!(!is_year_token(""));
/// ```
pub fn is_year_token(value: &str) -> bool {
    let digits = strip_separators(value.trim());
    digits.chars().count() >= 4 && digits.chars().all(|c| c.is_ascii_digit())
}

/// Remove `.` and `,` from a string
pub fn strip_separators(value: &str) -> String {
    value.chars().filter(|c| *c != '.' && *c != ',').collect()
}

/// Parse a numeric cell that arrived as text
///
/// Accepts plain `f64` syntax only. Decimal commas, dashes, blanks, words and
/// non-finite values yield `None`.
///
/// # Examples
///
/// ```
/// use ipca_normalizer::utils::parse_number;
///
/// assert_eq!(parse_number("1709.94"), Some(1709.94));
/// assert_eq!(parse_number(" 0,43 "), None);
/// assert_eq!(parse_number("-"), None);
/// assert_eq!(parse_number("NaN"), None);
/// ```
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_token_with_comma() {
        assert!(is_year_token("1,994"));
    }

    #[test]
    fn test_year_token_five_digits() {
        assert!(is_year_token("19940"));
    }

    #[test]
    fn test_year_token_rejects_mixed() {
        assert!(!is_year_token("1994*"));
        assert!(!is_year_token("19 94"));
        assert!(!is_year_token("...."));
    }

    #[test]
    fn test_parse_number_negative() {
        assert_eq!(parse_number("-0.21"), Some(-0.21));
    }

    #[test]
    fn test_parse_number_rejects_thousands_and_decimal_comma() {
        assert_eq!(parse_number("1.709,94"), None);
        assert_eq!(parse_number("0,43"), None);
        assert_eq!(parse_number("-0,21"), None);
    }

    #[test]
    fn test_parse_number_rejects_infinity() {
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_parse_number_text() {
        assert_eq!(parse_number("n/d"), None);
        assert_eq!(parse_number(""), None);
    }
}
