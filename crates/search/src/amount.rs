//! Price amount parsing shared by listing prices and price queries.

const CURRENCY_PREFIXES: &[&str] = &["₹", "$", "rs.", "rs", "inr"];
const CURRENCY_SUFFIXES: &[&str] = &["/-", "rupees", "rs", "inr", "₹"];

/// Parse a price amount such as `500`, `₹1,200`, `rs.450`, `2.5k` or `300/-`.
///
/// Returns `None` for anything that is not a non-negative finite number.
pub fn parse_amount(text: &str) -> Option<f64> {
    let lowered = text.trim().to_lowercase();
    let mut s = lowered.as_str();

    if let Some(rest) = CURRENCY_PREFIXES.iter().find_map(|p| s.strip_prefix(p)) {
        s = rest.trim_start();
    }
    if let Some(rest) = CURRENCY_SUFFIXES.iter().find_map(|p| s.strip_suffix(p)) {
        s = rest.trim_end();
    }

    let (digits, multiplier) = match s.strip_suffix('k') {
        Some(rest) => (rest.trim_end(), 1000.0),
        None => (s, 1.0),
    };

    let cleaned: String = digits.chars().filter(|c| *c != ',').collect();
    if !cleaned.chars().any(|c| c.is_ascii_digit())
        || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.')
    {
        return None;
    }

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v * multiplier)
}

/// True for standalone currency words that carry no amount (`rs`, `₹`, ...).
pub fn is_currency_marker(token: &str) -> bool {
    let token = token.trim().to_lowercase();
    CURRENCY_PREFIXES.contains(&token.as_str()) || CURRENCY_SUFFIXES.contains(&token.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse_amount("500"), Some(500.0));
        assert_eq!(parse_amount(" 99.5 "), Some(99.5));
    }

    #[test]
    fn test_currency_markers() {
        assert_eq!(parse_amount("₹1,200"), Some(1200.0));
        assert_eq!(parse_amount("rs.450"), Some(450.0));
        assert_eq!(parse_amount("Rs 300"), Some(300.0));
        assert_eq!(parse_amount("300/-"), Some(300.0));
        assert_eq!(parse_amount("$20"), Some(20.0));
    }

    #[test]
    fn test_thousands_suffix() {
        assert_eq!(parse_amount("5k"), Some(5000.0));
        assert_eq!(parse_amount("2.5k"), Some(2500.0));
    }

    #[test]
    fn test_rejects_non_numbers() {
        assert_eq!(parse_amount("cheap"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("rs"), None);
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount("-40"), None);
        assert_eq!(parse_amount("1e5"), None);
    }

    #[test]
    fn test_currency_marker_detection() {
        assert!(is_currency_marker("rs"));
        assert!(is_currency_marker("₹"));
        assert!(is_currency_marker("Rupees"));
        assert!(!is_currency_marker("500"));
    }
}
