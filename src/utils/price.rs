//! Price helpers. Amounts are integer cents end to end; text only appears at display time.

/// Formats cents as `$1234.56`.
pub fn format_price(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}${}.{:02}", sign, abs / 100, abs % 100)
}

/// Parses user input such as `59.99`, `$59.99`, `59,99` or `60` into cents.
///
/// At most two decimal places are accepted. Negative amounts are rejected.
pub fn parse_price(input: &str) -> Option<i64> {
    let trimmed = input.trim().trim_start_matches('$').trim().replace(',', ".");
    if trimmed.is_empty() || trimmed.starts_with('-') {
        return None;
    }

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed.as_str(), ""),
    };
    if fraction.len() > 2 || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let fraction_cents: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().ok()? * 10,
        _ => fraction.parse().ok()?,
    };

    whole.checked_mul(100)?.checked_add(fraction_cents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_cents() {
        assert_eq!(format_price(18997), "$189.97");
        assert_eq!(format_price(5), "$0.05");
        assert_eq!(format_price(0), "$0.00");
        assert_eq!(format_price(-250), "-$2.50");
    }

    #[test]
    fn parses_user_input() {
        assert_eq!(parse_price("59.99"), Some(5999));
        assert_eq!(parse_price("$ 59.99"), Some(5999));
        assert_eq!(parse_price("59,9"), Some(5990));
        assert_eq!(parse_price("60"), Some(6000));
        assert_eq!(parse_price(".5"), Some(50));
        assert_eq!(parse_price("1.999"), None);
        assert_eq!(parse_price("-1"), None);
        assert_eq!(parse_price("abc"), None);
        assert_eq!(parse_price(""), None);
    }
}
