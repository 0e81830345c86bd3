//! Number input helpers for comma-grouped fields such as the page count

/// Parse digits with optional `,` grouping. Anything else yields `None`.
pub fn parse_number(input: &str) -> Option<u64> {
    let digits: String = input.trim().chars().filter(|c| *c != ',').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Re-group a typed number for display: `"1234567"` becomes `"1,234,567"`.
/// Empty or non-numeric input formats as an empty string.
pub fn format_number(input: &str) -> String {
    parse_number(input).map(group_thousands).unwrap_or_default()
}

/// Insert `,` every three digits
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("412"), Some(412));
        assert_eq!(parse_number("1,234"), Some(1234));
        assert_eq!(parse_number(" 0 "), Some(0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("-3"), None);
        assert_eq!(parse_number("12abc"), None);
        assert_eq!(parse_number("1.5"), None);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number("1234"), "1,234");
        assert_eq!(format_number("12,34"), "1,234");
        assert_eq!(format_number("abc"), "");
    }
}
