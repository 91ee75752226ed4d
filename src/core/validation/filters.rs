//! Reusable input filters
//!
//! These filters normalize raw form text before it is validated or sent.

/// Filter: trim surrounding whitespace
pub fn trim(value: &str) -> String {
    value.trim().to_string()
}

/// Filter: keep ASCII digits only
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Filter: keep the `YYYY-MM-DD` prefix of a date-time string
pub fn date_prefix(value: &str) -> String {
    value.chars().take(10).collect()
}
