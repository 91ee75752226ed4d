//! Measurement status lifecycle

use crate::core::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a measurement appointment stands
///
/// The lifecycle only moves forward, one step at a time:
/// created → assigned → in_progress → approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementStatus {
    Created,
    Assigned,
    InProgress,
    Approved,
}

impl MeasurementStatus {
    pub const ALL: [MeasurementStatus; 4] = [
        MeasurementStatus::Created,
        MeasurementStatus::Assigned,
        MeasurementStatus::InProgress,
        MeasurementStatus::Approved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementStatus::Created => "created",
            MeasurementStatus::Assigned => "assigned",
            MeasurementStatus::InProgress => "in_progress",
            MeasurementStatus::Approved => "approved",
        }
    }

    /// Dashboard label: wire name with the first letter capitalised
    pub fn label(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn next(&self) -> Option<MeasurementStatus> {
        match self {
            MeasurementStatus::Created => Some(MeasurementStatus::Assigned),
            MeasurementStatus::Assigned => Some(MeasurementStatus::InProgress),
            MeasurementStatus::InProgress => Some(MeasurementStatus::Approved),
            MeasurementStatus::Approved => None,
        }
    }

    pub fn can_transition_to(&self, target: MeasurementStatus) -> bool {
        self.next() == Some(target)
    }

    /// Validate a status change
    pub fn transition_to(&self, target: MeasurementStatus) -> Result<MeasurementStatus, ValidationError> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(ValidationError::InvalidTransition {
                from: self.to_string(),
                to: target.to_string(),
            })
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, MeasurementStatus::Approved)
    }
}

impl fmt::Display for MeasurementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeasurementStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MeasurementStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidStatus {
                value: s.to_string(),
            })
    }
}
