//! Measurement appointments

use crate::core::entity::RecordId;
use crate::core::error::ValidationError;
use crate::core::field::parse_calendar_date;
use crate::core::status::MeasurementStatus;
use crate::entities::lenient;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One measured area of a site visit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Area {
    #[serde(default, deserialize_with = "lenient::string")]
    pub area_name: String,

    #[serde(default, deserialize_with = "lenient::optional_f64")]
    pub height: Option<f64>,

    #[serde(default, deserialize_with = "lenient::optional_f64")]
    pub width: Option<f64>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub notes: String,

    #[serde(default)]
    pub photo_urls: Vec<String>,
}

/// A customer measurement appointment as the backend stores it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub customer_name: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub customer_mobile: String,

    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub customer_address: Option<String>,

    /// ISO date or date-time
    #[serde(default)]
    pub measurement_date: Option<String>,

    /// Assigned field user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<RecordId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MeasurementStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default)]
    pub areas: Vec<Area>,
}

crate::impl_entity!(Measurement, "measurement", "measurements", id);

impl Measurement {
    pub fn new(
        customer_name: impl Into<String>,
        customer_mobile: impl Into<String>,
        customer_address: impl Into<String>,
    ) -> Self {
        Self {
            customer_name: customer_name.into(),
            customer_mobile: customer_mobile.into(),
            customer_address: Some(customer_address.into()),
            ..Self::default()
        }
    }

    /// Status, `created` when the backend sent none
    pub fn status(&self) -> MeasurementStatus {
        self.status.unwrap_or(MeasurementStatus::Created)
    }

    pub fn is_approved(&self) -> bool {
        self.status().is_approved()
    }

    /// Calendar day of the appointment
    pub fn measurement_day(&self) -> Option<NaiveDate> {
        self.measurement_date.as_deref().and_then(parse_calendar_date)
    }

    /// Move one step forward in the lifecycle
    pub fn advance_to(&mut self, target: MeasurementStatus) -> Result<(), ValidationError> {
        self.status = Some(self.status().transition_to(target)?);
        Ok(())
    }

    /// Hand the appointment to a field user
    ///
    /// A freshly created appointment moves to `assigned`; later stages keep
    /// their status.
    pub fn assign_to(&mut self, user_id: RecordId) {
        self.user_id = Some(user_id);
        if self.status() == MeasurementStatus::Created {
            self.status = Some(MeasurementStatus::Assigned);
        }
    }

    pub fn photo_count(&self) -> usize {
        self.areas.iter().map(|a| a.photo_urls.len()).sum()
    }
}
