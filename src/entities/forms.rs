//! Edit forms for measurements and users
//!
//! A form holds what the user typed, as text, until it is submitted. It
//! knows how to hydrate itself from a stored entity, how to validate, and
//! how to turn itself back into the payload the backend expects.

use crate::core::auth::{Action, Capabilities};
use crate::core::entity::RecordId;
use crate::core::error::{AuthError, DeskResult, ValidationError};
use crate::core::field::FieldFormat;
use crate::core::service::{PhotoUpload, PhotoUploader};
use crate::core::validation::{FormErrors, filters, validators};
use crate::entities::measurement::{Area, Measurement};
use crate::entities::user::User;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A photo attached to an area row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoRef {
    /// Already stored by the backend
    Stored { url: String },
    /// Picked or captured on the device, uploaded on submit
    Pending(PhotoUpload),
}

impl PhotoRef {
    /// What the form shows for this photo
    pub fn preview(&self) -> &str {
        match self {
            PhotoRef::Stored { url } => url,
            PhotoRef::Pending(upload) => &upload.file_name,
        }
    }
}

/// Absolute URL for a stored photo path
pub fn resolve_photo_url(url: &str, base_url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            url.trim_start_matches('/')
        )
    }
}

/// One area row of the measurement form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AreaForm {
    pub area_name: String,
    pub height: String,
    pub width: String,
    pub notes: String,
    pub photos: Vec<PhotoRef>,
}

impl AreaForm {
    /// Name and both dimensions left empty
    pub fn is_blank(&self) -> bool {
        self.area_name.trim().is_empty()
            && self.height.trim().is_empty()
            && self.width.trim().is_empty()
    }

    fn shape(&self) -> (String, Option<f64>, Option<f64>, String) {
        (
            self.area_name.clone(),
            self.height.trim().parse().ok(),
            self.width.trim().parse().ok(),
            self.notes.clone(),
        )
    }

    fn stored_photo_count(&self) -> usize {
        self.photos
            .iter()
            .filter(|p| matches!(p, PhotoRef::Stored { .. }))
            .count()
    }
}

/// Create/edit form of a measurement appointment
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementForm {
    pub id: Option<RecordId>,
    pub name: String,
    pub mobile: String,
    pub address: String,
    /// `YYYY-MM-DD`
    pub measurement_date: String,
    /// Date filled in for an undated appointment; keeping it is not a change
    pub defaulted_date: Option<String>,
    pub selected_user: Option<RecordId>,
    pub areas: Vec<AreaForm>,
}

impl MeasurementForm {
    /// Empty form dated `today`, with no area rows
    pub fn new(today: NaiveDate) -> Self {
        Self {
            id: None,
            name: String::new(),
            mobile: String::new(),
            address: String::new(),
            measurement_date: today.format("%Y-%m-%d").to_string(),
            defaulted_date: None,
            selected_user: None,
            areas: Vec::new(),
        }
    }

    /// Hydrate the form from a stored appointment
    ///
    /// The date is cut to its day, relative photo paths are resolved
    /// against `base_url`, and dimensions become text again.
    pub fn from_measurement(measurement: &Measurement, base_url: &str, today: NaiveDate) -> Self {
        let (measurement_date, defaulted_date) = match measurement.measurement_date.as_deref() {
            Some(date) => (filters::date_prefix(date), None),
            None => {
                let today = today.format("%Y-%m-%d").to_string();
                (today.clone(), Some(today))
            }
        };

        Self {
            id: measurement.id.clone(),
            name: measurement.customer_name.clone(),
            mobile: measurement.customer_mobile.clone(),
            address: measurement.customer_address.clone().unwrap_or_default(),
            measurement_date,
            defaulted_date,
            selected_user: measurement.user_id.clone(),
            areas: measurement
                .areas
                .iter()
                .map(|area| AreaForm {
                    area_name: area.area_name.clone(),
                    height: area.height.map(|h| h.to_string()).unwrap_or_default(),
                    width: area.width.map(|w| w.to_string()).unwrap_or_default(),
                    notes: area.notes.clone(),
                    photos: area
                        .photo_urls
                        .iter()
                        .map(|url| PhotoRef::Stored {
                            url: resolve_photo_url(url, base_url),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    pub fn add_area(&mut self) {
        self.areas.push(AreaForm::default());
    }

    pub fn remove_area(&mut self, index: usize) -> Option<AreaForm> {
        (index < self.areas.len()).then(|| self.areas.remove(index))
    }

    /// Attach photos to an area row
    ///
    /// Photos above `max_bytes` are skipped; the returned messages name
    /// each skipped file.
    pub fn add_photos(
        &mut self,
        area_index: usize,
        photos: Vec<PhotoUpload>,
        max_bytes: usize,
    ) -> Result<Vec<String>, ValidationError> {
        let area = self
            .areas
            .get_mut(area_index)
            .ok_or_else(|| area_out_of_range(area_index))?;

        let check = validators::max_bytes(max_bytes);
        let mut rejected = Vec::new();
        for photo in photos {
            match check(&photo.file_name, photo.size()) {
                Ok(()) => area.photos.push(PhotoRef::Pending(photo)),
                Err(message) => {
                    tracing::warn!(file = %photo.file_name, size = photo.size(), "photo rejected");
                    rejected.push(message);
                }
            }
        }
        Ok(rejected)
    }

    pub fn remove_photo(&mut self, area_index: usize, photo_index: usize) -> Option<PhotoRef> {
        let area = self.areas.get_mut(area_index)?;
        (photo_index < area.photos.len()).then(|| area.photos.remove(photo_index))
    }

    /// Validate the form, dropping blank area rows first
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        self.areas.retain(|area| !area.is_blank());

        let mut errors = FormErrors::new();
        errors.check("name", &self.name, validators::required("Name is required"));
        errors.check(
            "mobile",
            &self.mobile,
            validators::mobile_number("Mobile number is required"),
        );
        errors.check("address", &self.address, validators::required("Address is required"));

        for (index, area) in self.areas.iter().enumerate() {
            errors.check(
                &format!("areas[{}].area_name", index),
                &area.area_name,
                validators::required("Area Name is required"),
            );
            for (field, value, missing) in [
                ("height", &area.height, "Height is required"),
                ("width", &area.width, "Width is required"),
            ] {
                let field = format!("areas[{}].{}", index, field);
                if errors.check(&field, value, validators::required(missing)) {
                    errors.check(&field, value, validators::numeric());
                }
            }
        }

        errors.into_result(())
    }

    /// Check that `capabilities` cover every change against `original`
    ///
    /// `original` is `None` for a new appointment.
    pub fn ensure_allowed(
        &self,
        original: Option<&Measurement>,
        capabilities: &Capabilities,
    ) -> Result<(), AuthError> {
        let Some(original) = original else {
            return capabilities.require(None, Action::Create);
        };
        let status = Some(original.status());

        let customer_changed = self.name != original.customer_name
            || self.mobile != original.customer_mobile
            || self.address != original.customer_address.clone().unwrap_or_default();
        if customer_changed {
            capabilities.require(status, Action::EditCustomerDetails)?;
        }

        if self.selected_user != original.user_id {
            capabilities.require(status, Action::AssignUser)?;
        }

        let date_changed = match original.measurement_date.as_deref() {
            Some(date) => self.measurement_date != filters::date_prefix(date),
            None => self.defaulted_date.as_deref() != Some(self.measurement_date.as_str()),
        };
        if date_changed {
            capabilities.require(status, Action::ChangeDate)?;
        }

        let areas_changed = self.areas.len() != original.areas.len()
            || self
                .areas
                .iter()
                .zip(&original.areas)
                .any(|(form, stored)| form.shape() != stored_shape(stored));
        if areas_changed {
            capabilities.require(status, Action::EditAreas)?;
        }

        let photos_changed = self.areas.iter().any(|area| {
            area.photos
                .iter()
                .any(|p| matches!(p, PhotoRef::Pending(_)))
        }) || self
            .areas
            .iter()
            .zip(&original.areas)
            .any(|(form, stored)| form.stored_photo_count() != stored.photo_urls.len());
        if photos_changed {
            capabilities.require(status, Action::ManagePhotos)?;
        }

        Ok(())
    }

    /// Validate, upload pending photos and build the backend payload
    pub async fn into_payload(mut self, uploader: &dyn PhotoUploader) -> DeskResult<Measurement> {
        self.validate()?;

        let mut areas = Vec::with_capacity(self.areas.len());
        for area in self.areas {
            let mut photo_urls = Vec::with_capacity(area.photos.len());
            for photo in &area.photos {
                let url = match photo {
                    PhotoRef::Stored { url } => url.clone(),
                    PhotoRef::Pending(upload) => {
                        let url = uploader.upload(upload).await?;
                        tracing::debug!(file = %upload.file_name, url = %url, "photo uploaded");
                        url
                    }
                };
                photo_urls.push(url);
            }

            areas.push(Area {
                area_name: area.area_name,
                height: area.height.trim().parse().ok(),
                width: area.width.trim().parse().ok(),
                notes: area.notes,
                photo_urls,
            });
        }

        Ok(Measurement {
            id: self.id,
            customer_name: self.name,
            customer_mobile: self.mobile,
            customer_address: Some(self.address),
            measurement_date: Some(self.measurement_date),
            user_id: self.selected_user,
            status: None,
            created_at: None,
            areas,
        })
    }

    /// Serializable snapshot; pending photos are not kept
    pub fn to_draft(&self) -> MeasurementDraft {
        MeasurementDraft {
            id: self.id.clone(),
            name: self.name.clone(),
            mobile: self.mobile.clone(),
            address: self.address.clone(),
            measurement_date: self.measurement_date.clone(),
            defaulted_date: self.defaulted_date.clone(),
            selected_user: self.selected_user.clone(),
            areas: self
                .areas
                .iter()
                .map(|area| AreaDraft {
                    area_name: area.area_name.clone(),
                    height: area.height.clone(),
                    width: area.width.clone(),
                    notes: area.notes.clone(),
                    photos: area
                        .photos
                        .iter()
                        .filter_map(|photo| match photo {
                            PhotoRef::Stored { url } => Some(PhotoPreview {
                                preview: url.clone(),
                            }),
                            PhotoRef::Pending(_) => None,
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    pub fn from_draft(draft: MeasurementDraft) -> Self {
        Self {
            id: draft.id,
            name: draft.name,
            mobile: draft.mobile,
            address: draft.address,
            measurement_date: draft.measurement_date,
            defaulted_date: draft.defaulted_date,
            selected_user: draft.selected_user,
            areas: draft
                .areas
                .into_iter()
                .map(|area| AreaForm {
                    area_name: area.area_name,
                    height: area.height,
                    width: area.width,
                    notes: area.notes,
                    photos: area
                        .photos
                        .into_iter()
                        .map(|p| PhotoRef::Stored { url: p.preview })
                        .collect(),
                })
                .collect(),
        }
    }
}

fn stored_shape(area: &Area) -> (String, Option<f64>, Option<f64>, String) {
    (area.area_name.clone(), area.height, area.width, area.notes.clone())
}

fn area_out_of_range(index: usize) -> ValidationError {
    ValidationError::FieldError {
        field: "areas".to_string(),
        message: format!("No area row at position {}", index),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoPreview {
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaDraft {
    #[serde(default)]
    pub area_name: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub width: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub photos: Vec<PhotoPreview>,
}

/// Draft of a measurement form kept between page visits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementDraft {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub measurement_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaulted_date: Option<String>,
    #[serde(default)]
    pub selected_user: Option<RecordId>,
    #[serde(default)]
    pub areas: Vec<AreaDraft>,
}

/// Create/edit form of a directory user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserForm {
    #[serde(default)]
    pub user_id: Option<RecordId>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    pub phone: String,
}

impl UserForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.user_id.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone().unwrap_or_default(),
            phone: user.phone.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = FormErrors::new();
        errors.check(
            "first_name",
            &self.first_name,
            validators::required("First name is required"),
        );
        errors.check(
            "last_name",
            &self.last_name,
            validators::required("Last name is required"),
        );
        if !FieldFormat::Mobile.matches(&self.phone) {
            errors.push("phone", "Phone must be 10 digits");
        }
        errors.check("email", &self.email, validators::optional_email());
        errors.into_result(())
    }

    /// Validated user payload; the role of `existing` is carried over
    pub fn into_user(self, existing: Option<&User>) -> Result<User, ValidationError> {
        self.validate()?;
        let email = filters::trim(&self.email);
        Ok(User {
            user_id: self.user_id,
            first_name: filters::trim(&self.first_name),
            last_name: filters::trim(&self.last_name),
            email: (!email.is_empty()).then_some(email),
            phone: self.phone,
            role: existing.and_then(|u| u.role.clone()),
            created_at: existing.and_then(|u| u.created_at.clone()),
        })
    }
}
