//! Form validation
//!
//! Forms run their fields through the [`validators`] and collect every
//! failure in a [`FormErrors`], in the order the fields appear on screen,
//! so the presentation layer can show all messages at once.

pub mod filters;
pub mod validators;

use crate::core::error::{FieldValidationError, ValidationError};

/// Ordered collection of field errors for one form submission
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormErrors {
    errors: Vec<FieldValidationError>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `rule` against `value` and record its message under `field`
    pub fn check<F>(&mut self, field: &str, value: &str, rule: F) -> bool
    where
        F: Fn(&str, &str) -> Result<(), String>,
    {
        match rule(field, value) {
            Ok(()) => true,
            Err(message) => {
                self.push(field, message);
                false
            }
        }
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldValidationError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// `Ok(value)` when nothing failed, otherwise every recorded error
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationError> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(ValidationError::FieldErrors(self.errors))
        }
    }
}
