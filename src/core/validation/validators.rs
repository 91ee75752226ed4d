//! Reusable form field validators
//!
//! Each validator takes the field name and the raw text typed into the
//! form and returns the message to show under the field.

use crate::core::field::FieldFormat;

/// Validator: trimmed text must not be empty
pub fn required(
    message: &'static str,
) -> impl Fn(&str, &str) -> Result<(), String> + Send + Sync + Clone {
    move |_: &str, value: &str| {
        if value.trim().is_empty() {
            Err(message.to_string())
        } else {
            Ok(())
        }
    }
}

/// Validator: required, then exactly ten digits
pub fn mobile_number(
    missing: &'static str,
) -> impl Fn(&str, &str) -> Result<(), String> + Send + Sync + Clone {
    move |_: &str, value: &str| {
        if value.trim().is_empty() {
            Err(missing.to_string())
        } else if !FieldFormat::Mobile.matches(value) {
            Err("Enter a valid 10-digit number".to_string())
        } else {
            Ok(())
        }
    }
}

/// Validator: email shape, skipped when the field is blank
pub fn optional_email() -> impl Fn(&str, &str) -> Result<(), String> + Send + Sync + Clone {
    |_: &str, value: &str| {
        if value.trim().is_empty() || FieldFormat::Email.matches(value.trim()) {
            Ok(())
        } else {
            Err("Invalid email format".to_string())
        }
    }
}

/// Validator: text must parse as a number
pub fn numeric() -> impl Fn(&str, &str) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &str| {
        if value.trim().parse::<f64>().is_ok_and(f64::is_finite) {
            Ok(())
        } else {
            Err(format!("'{}' must be a number (current value: {})", field, value))
        }
    }
}

/// Validator: payload size must not exceed `max_bytes`
pub fn max_bytes(max_bytes: usize) -> impl Fn(&str, usize) -> Result<(), String> + Send + Sync + Clone {
    move |name: &str, size: usize| {
        if size > max_bytes {
            Err(format!(
                "\"{}\" exceeds {} KB and will not be uploaded.",
                name,
                max_bytes / 1024
            ))
        } else {
            Ok(())
        }
    }
}
