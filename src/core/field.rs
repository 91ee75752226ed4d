//! Field access and value interpretation
//!
//! Records are loose JSON objects. This module decides how a raw
//! [`serde_json::Value`] reads as sortable data, searchable text and a
//! calendar date, so the query engine never has to look at JSON variants.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::sync::OnceLock;

/// Read access to named fields of a record-like value
pub trait FieldAccess {
    /// Raw value of `name`, `None` if the field is absent
    fn field(&self, name: &str) -> Option<&Value>;

    /// Value of `name` unless it is absent or `null`
    fn present(&self, name: &str) -> Option<&Value> {
        self.field(name).filter(|v| !v.is_null())
    }
}

impl FieldAccess for Map<String, Value> {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl FieldAccess for Value {
    fn field(&self, name: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(name))
    }
}

/// Text used by substring search
///
/// Strings are used as-is and numbers through their decimal form. Every
/// other kind is not searchable.
pub fn search_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        _ => None,
    }
}

/// Calendar day of a date-ish value
///
/// Strings go through [`parse_calendar_date`]; numbers are epoch
/// milliseconds in UTC.
pub fn calendar_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_calendar_date(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.date_naive()),
        _ => None,
    }
}

/// Parse an ISO-8601 date or date-time into its calendar day
///
/// The day is the one written in the value, in its own offset.
pub fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    match DateTime::parse_from_rfc3339(input.trim()) {
        Ok(dt) => Some(dt.date_naive()),
        Err(_) => parse_timestamp(input).map(|dt| dt.date_naive()),
    }
}

/// Parse an ISO-8601 date or date-time as a UTC instant
///
/// Values without an offset are read as UTC; a bare date is midnight.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Relational order of two non-null values
///
/// Values of the same kind compare naturally. Different kinds rank
/// bool < number < string < array < object so the order stays total.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                x.cmp(&y)
            } else if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                x.cmp(&y)
            } else {
                let x = x.as_f64().unwrap_or(0.0);
                let y = y.as_f64().unwrap_or(0.0);
                x.total_cmp(&y)
            }
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => {
            a.to_string().cmp(&b.to_string())
        }
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

/// Field format validators used by the form rules
#[derive(Debug, Clone)]
pub enum FieldFormat {
    Email,
    /// Exactly ten ASCII digits
    Mobile,
    Custom(Regex),
}

impl FieldFormat {
    /// Check a string against this format
    pub fn matches(&self, value: &str) -> bool {
        match self {
            FieldFormat::Email => Self::is_valid_email(value),
            FieldFormat::Mobile => Self::is_valid_mobile(value),
            FieldFormat::Custom(regex) => regex.is_match(value),
        }
    }

    fn is_valid_email(email: &str) -> bool {
        static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = EMAIL_REGEX.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
        regex.is_match(email)
    }

    fn is_valid_mobile(mobile: &str) -> bool {
        static MOBILE_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = MOBILE_REGEX.get_or_init(|| Regex::new(r"^[0-9]{10}$").unwrap());
        regex.is_match(mobile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_present_skips_null() {
        let record = json!({"name": null, "mobile": "123"});
        assert!(record.present("name").is_none());
        assert!(record.field("name").is_some());
        assert_eq!(record.present("mobile"), Some(&json!("123")));
        assert!(record.present("address").is_none());
    }

    #[test]
    fn test_search_text_kinds() {
        assert_eq!(search_text(&json!("Raj")).as_deref(), Some("Raj"));
        assert_eq!(search_text(&json!(9876543210_u64)).as_deref(), Some("9876543210"));
        assert!(search_text(&json!(true)).is_none());
        assert!(search_text(&json!(["a"])).is_none());
    }

    #[test]
    fn test_parse_calendar_date_forms() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(parse_calendar_date("2024-03-10"), Some(day));
        assert_eq!(parse_calendar_date("2024-03-10T18:45:00"), Some(day));
        assert_eq!(parse_calendar_date("2024-03-10T00:00:00.000Z"), Some(day));
        assert_eq!(parse_calendar_date("2024-03-10 09:15:00"), Some(day));
        // The written day wins, even where UTC has moved on
        assert_eq!(parse_calendar_date("2024-03-10T23:30:00-02:00"), Some(day));
        assert_eq!(parse_calendar_date("2024-03-10T01:00:00+05:30"), Some(day));
    }

    #[test]
    fn test_parse_timestamp_keeps_time_of_day() {
        let morning = parse_timestamp("2024-03-10T08:00:00Z").unwrap();
        let evening = parse_timestamp("2024-03-10 20:00:00").unwrap();
        let midnight = parse_timestamp("2024-03-10").unwrap();
        assert!(midnight < morning && morning < evening);
    }

    #[test]
    fn test_parse_calendar_date_rejects_garbage() {
        assert_eq!(parse_calendar_date(""), None);
        assert_eq!(parse_calendar_date("not a date"), None);
        assert_eq!(parse_calendar_date("2024-13-40"), None);
    }

    #[test]
    fn test_calendar_date_from_epoch_millis() {
        // 2024-01-05T00:00:00Z
        let value = json!(1_704_412_800_000_i64);
        assert_eq!(calendar_date(&value), NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(calendar_date(&json!(false)), None);
    }

    #[test]
    fn test_compare_values_same_kind() {
        assert_eq!(compare_values(&json!(3), &json!(5)), Ordering::Less);
        assert_eq!(compare_values(&json!(2.5), &json!(2)), Ordering::Greater);
        assert_eq!(compare_values(&json!("b"), &json!("a")), Ordering::Greater);
        assert_eq!(compare_values(&json!("a"), &json!("a")), Ordering::Equal);
        assert_eq!(compare_values(&json!(false), &json!(true)), Ordering::Less);
    }

    #[test]
    fn test_compare_values_mixed_kinds_rank() {
        assert_eq!(compare_values(&json!(true), &json!(1)), Ordering::Less);
        assert_eq!(compare_values(&json!(10), &json!("1")), Ordering::Less);
        assert_eq!(compare_values(&json!({"a": 1}), &json!("z")), Ordering::Greater);
    }

    #[test]
    fn test_mobile_format() {
        let format = FieldFormat::Mobile;
        assert!(format.matches("9876543210"));
        assert!(!format.matches("987654321"));
        assert!(!format.matches("98765432100"));
        assert!(!format.matches("98765-4321"));
    }

    #[test]
    fn test_email_format() {
        let format = FieldFormat::Email;
        assert!(format.matches("admin@demo.com"));
        assert!(format.matches("user.name+tag@example.co.uk"));
        assert!(!format.matches("invalid-email"));
        assert!(!format.matches("a b@demo.com"));
    }

    #[test]
    fn test_custom_format() {
        let format = FieldFormat::Custom(Regex::new(r"^[A-Z]{3}\d{3}$").unwrap());
        assert!(format.matches("ABC123"));
        assert!(!format.matches("abc123"));
    }
}
