//! Session-scoped form drafts

use crate::core::error::{DeskResult, StorageError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

pub const MEASUREMENT_FORM_DRAFT: &str = "measurement_form_draft";
pub const USER_FORM_DRAFT: &str = "user_form_draft";

/// Keyed JSON drafts that live as long as the session
///
/// Drafts are stored as serialized text, so a value survives only what
/// its JSON form can carry.
#[derive(Clone, Default)]
pub struct DraftStore {
    drafts: Arc<RwLock<HashMap<String, String>>>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save<T: Serialize>(&self, key: &str, draft: &T) -> DeskResult<()> {
        let json = serde_json::to_string(draft)?;
        let mut drafts = self.drafts.write().map_err(|e| StorageError::Lock {
            mode: "write",
            message: e.to_string(),
        })?;
        drafts.insert(key.to_string(), json);
        Ok(())
    }

    /// Draft under `key`, `None` if nothing was saved
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> DeskResult<Option<T>> {
        let drafts = self.drafts.read().map_err(|e| StorageError::Lock {
            mode: "read",
            message: e.to_string(),
        })?;
        let Some(json) = drafts.get(key) else {
            return Ok(None);
        };
        serde_json::from_str(json)
            .map(Some)
            .map_err(|e| {
                StorageError::CorruptDraft {
                    key: key.to_string(),
                    message: e.to_string(),
                }
                .into()
            })
    }

    pub fn clear(&self, key: &str) -> DeskResult<()> {
        let mut drafts = self.drafts.write().map_err(|e| StorageError::Lock {
            mode: "write",
            message: e.to_string(),
        })?;
        drafts.remove(key);
        Ok(())
    }

    /// Raw text of a draft
    pub fn raw(&self, key: &str) -> DeskResult<Option<String>> {
        let drafts = self.drafts.read().map_err(|e| StorageError::Lock {
            mode: "read",
            message: e.to_string(),
        })?;
        Ok(drafts.get(key).cloned())
    }

    /// Store raw text as a draft without checking it
    pub fn save_raw(&self, key: &str, json: impl Into<String>) -> DeskResult<()> {
        let mut drafts = self.drafts.write().map_err(|e| StorageError::Lock {
            mode: "write",
            message: e.to_string(),
        })?;
        drafts.insert(key.to_string(), json.into());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::DeskError;
    use crate::entities::forms::{MeasurementDraft, MeasurementForm, UserForm};
    use crate::core::service::PhotoUpload;
    use chrono::NaiveDate;

    #[test]
    fn test_save_load_clear() {
        let store = DraftStore::new();
        let form = UserForm {
            first_name: "Asha".to_string(),
            ..UserForm::default()
        };

        store.save(USER_FORM_DRAFT, &form).unwrap();
        let loaded: Option<UserForm> = store.load(USER_FORM_DRAFT).unwrap();
        assert_eq!(loaded, Some(form));

        store.clear(USER_FORM_DRAFT).unwrap();
        let loaded: Option<UserForm> = store.load(USER_FORM_DRAFT).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_measurement_draft_has_previews_only() {
        let store = DraftStore::new();
        let mut form = MeasurementForm::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        form.add_area();
        form.areas[0].photos.push(crate::entities::PhotoRef::Stored {
            url: "https://host/uploads/a.jpg".to_string(),
        });
        form.add_photos(0, vec![PhotoUpload::captured(vec![7; 16])], 102_400)
            .unwrap();

        store.save(MEASUREMENT_FORM_DRAFT, &form.to_draft()).unwrap();
        let raw = store.raw(MEASUREMENT_FORM_DRAFT).unwrap().unwrap();
        assert!(raw.contains("\"preview\":\"https://host/uploads/a.jpg\""));
        assert!(!raw.contains("captured.jpg"));

        let draft: MeasurementDraft = store.load(MEASUREMENT_FORM_DRAFT).unwrap().unwrap();
        assert_eq!(draft.measurement_date, "2024-06-01");
    }

    #[test]
    fn test_corrupt_draft() {
        let store = DraftStore::new();
        store.save_raw(USER_FORM_DRAFT, "{not json").unwrap();
        let err = store.load::<UserForm>(USER_FORM_DRAFT).unwrap_err();
        assert!(matches!(
            err,
            DeskError::Storage(StorageError::CorruptDraft { .. })
        ));
    }
}
