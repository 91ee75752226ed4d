//! Service traits for the remote collaborators

use crate::core::entity::{Entity, RecordId};
use crate::core::error::DeskResult;
use async_trait::async_trait;

/// Service trait for one resource collection
///
/// Implementations provide CRUD operations for a specific entity type.
/// The query engine never calls a service: screens fetch through one and
/// hand the collection to the engine.
#[async_trait]
pub trait RecordService<T: Entity>: Send + Sync {
    /// List the whole collection
    async fn list(&self) -> DeskResult<Vec<T>>;

    /// Get one entity, `StorageError::NotFound` if it does not exist
    async fn get(&self, id: &RecordId) -> DeskResult<T>;

    /// Create an entity and return it as stored
    async fn create(&self, entity: T) -> DeskResult<T>;

    /// Replace an existing entity
    async fn update(&self, id: &RecordId, entity: T) -> DeskResult<T>;

    async fn delete(&self, id: &RecordId) -> DeskResult<()>;
}

/// A photo picked or captured on the device, not uploaded yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PhotoUpload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// A JPEG frame from the camera
    pub fn captured(bytes: Vec<u8>) -> Self {
        Self::new("captured.jpg", "image/jpeg", bytes)
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Uploads a photo and returns the URL the backend stored it under
#[async_trait]
pub trait PhotoUploader: Send + Sync {
    async fn upload(&self, photo: &PhotoUpload) -> DeskResult<String>;
}
