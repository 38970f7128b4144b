/// Portuguese month tokens as they appear in the IBGE series
///
/// The set is closed: 12 abbreviations and 12 full names. Matching trims and
/// uppercases, so `" jan "`, `"Janeiro"` and `"março"` are all accepted.
const MONTH_TOKENS: [(&str, &str); 12] = [
    ("JAN", "JANEIRO"),
    ("FEV", "FEVEREIRO"),
    ("MAR", "MARÇO"),
    ("ABR", "ABRIL"),
    ("MAI", "MAIO"),
    ("JUN", "JUNHO"),
    ("JUL", "JULHO"),
    ("AGO", "AGOSTO"),
    ("SET", "SETEMBRO"),
    ("OUT", "OUTUBRO"),
    ("NOV", "NOVEMBRO"),
    ("DEZ", "DEZEMBRO"),
];

/// Map a month token to 1..=12, or `None` if it is not a recognized month
pub fn month_number(token: &str) -> Option<u32> {
    let upper = token.trim().to_uppercase();
    if upper.is_empty() {
        return None;
    }

    MONTH_TOKENS
        .iter()
        .position(|(short, full)| upper == *short || upper == *full)
        .map(|idx| idx as u32 + 1)
}

pub fn is_month_token(token: &str) -> bool {
    month_number(token).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbreviated_and_full_names() {
        assert_eq!(month_number("JAN"), Some(1));
        assert_eq!(month_number("JANEIRO"), Some(1));
        assert_eq!(month_number("jan"), Some(1));
        assert_eq!(month_number("DEZEMBRO"), Some(12));
        assert_eq!(month_number("set"), Some(9));
    }

    #[test]
    fn test_accented_march() {
        assert_eq!(month_number("MARÇO"), Some(3));
        assert_eq!(month_number("março"), Some(3));
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(month_number("  fev "), Some(2));
    }

    #[test]
    fn test_unknown_tokens() {
        assert_eq!(month_number("XYZ"), None);
        assert_eq!(month_number(""), None);
        assert_eq!(month_number("NAN"), None);
        assert_eq!(month_number("JANE"), None);
        // English abbreviations are not part of the source locale
        assert_eq!(month_number("FEB"), None);
    }
}
