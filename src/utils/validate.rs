//! Form validation shared by the signup, profile and game windows.

use chrono::NaiveDate;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Names of the fields left blank, in form order.
pub fn missing_fields<'a>(fields: &[(&'a str, &str)]) -> Vec<&'a str> {
    fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| *label)
        .collect()
}

/// Checks that no field is blank; the error lists every blank field.
pub fn require_filled(fields: &[(&str, &str)]) -> Result<(), String> {
    let missing = missing_fields(fields);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(format!("Please fill in: {}", missing.join(", ")))
    }
}

pub fn is_valid_username(username: &str) -> bool {
    let len = username.chars().count();
    (3..=32).contains(&len)
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
}

/// `local@domain.tld`, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}

/// Digits and spaces, optional leading `+`, 6 to 15 digits.
pub fn is_valid_telephone(telephone: &str) -> bool {
    let telephone = telephone.trim();
    let body = telephone.strip_prefix('+').unwrap_or(telephone);
    let digits = body.chars().filter(char::is_ascii_digit).count();
    body.chars().all(|c| c.is_ascii_digit() || c == ' ') && (6..=15).contains(&digits)
}

/// 13 to 19 digits; spaces and dashes between groups are allowed.
pub fn is_valid_card_number(card: &str) -> bool {
    let card = card.trim();
    let digits = card.chars().filter(char::is_ascii_digit).count();
    card.chars().all(|c| c.is_ascii_digit() || c == ' ' || c == '-') && (13..=19).contains(&digits)
}

pub fn check_password(password: &str, confirmation: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "The password must have at least {} characters",
            MIN_PASSWORD_LEN
        ));
    }
    if password != confirmation {
        return Err("The passwords do not match".to_string());
    }
    Ok(())
}

/// `YYYY-MM-DD`
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}
