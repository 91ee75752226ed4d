//! Entity trait shared by every resource the dashboard lists

use crate::core::error::{DeskResult, ValidationError};
use crate::core::record::Record;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend identifier: numeric for some resources, text for others
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    /// Identifier for a record created locally
    pub fn generate() -> Self {
        RecordId::Text(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{}", id),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Int(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId::Text(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        RecordId::Text(id)
    }
}

/// A resource exposed by the backend under `/api/{resource_name}`
///
/// Entities travel as typed values through services and forms, and are
/// turned into a loose [`Record`] when a table lists them.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The plural resource name used in URLs (e.g., "measurements", "users")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "measurement", "user")
    fn resource_name_singular() -> &'static str;

    /// Identifier, `None` until the backend assigned one
    fn id(&self) -> Option<&RecordId>;

    fn set_id(&mut self, id: RecordId);

    /// Field view used by the query engine
    fn to_record(&self) -> DeskResult<Record> {
        let value = serde_json::to_value(self)?;
        Record::try_from(value).map_err(|other| {
            ValidationError::InvalidJson {
                message: format!(
                    "{} did not serialize to an object: {}",
                    Self::resource_name_singular(),
                    other
                ),
            }
            .into()
        })
    }
}

/// Record views of a whole collection
pub fn to_records<T: Entity>(entities: &[T]) -> DeskResult<Vec<Record>> {
    entities.iter().map(Entity::to_record).collect()
}
