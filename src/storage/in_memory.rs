//! In-memory implementation of RecordService for testing and development

use crate::core::entity::{Entity, RecordId};
use crate::core::error::{DeskResult, StorageError};
use crate::core::service::RecordService;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};

/// In-memory record service
///
/// Keeps entities in insertion order, the way a backend list endpoint
/// returns them. Uses RwLock for thread-safe access.
#[derive(Clone)]
pub struct InMemoryRecordService<T: Entity> {
    items: Arc<RwLock<IndexMap<RecordId, T>>>,
}

impl<T: Entity> InMemoryRecordService<T> {
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Service pre-filled with `entities`; missing ids are generated
    pub fn with_entities(entities: impl IntoIterator<Item = T>) -> DeskResult<Self> {
        let service = Self::new();
        {
            let mut items = service.write()?;
            for mut entity in entities {
                let id = match entity.id() {
                    Some(id) => id.clone(),
                    None => {
                        let id = RecordId::generate();
                        entity.set_id(id.clone());
                        id
                    }
                };
                items.insert(id, entity);
            }
        }
        Ok(service)
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, IndexMap<RecordId, T>>, StorageError> {
        self.items.read().map_err(|e| StorageError::Lock {
            mode: "read",
            message: e.to_string(),
        })
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, IndexMap<RecordId, T>>, StorageError> {
        self.items.write().map_err(|e| StorageError::Lock {
            mode: "write",
            message: e.to_string(),
        })
    }

    fn not_found(id: &RecordId) -> StorageError {
        StorageError::NotFound {
            kind: T::resource_name_singular().to_string(),
            id: id.to_string(),
        }
    }
}

impl<T: Entity> Default for InMemoryRecordService<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> RecordService<T> for InMemoryRecordService<T> {
    async fn list(&self) -> DeskResult<Vec<T>> {
        let items = self.read()?;
        Ok(items.values().cloned().collect())
    }

    async fn get(&self, id: &RecordId) -> DeskResult<T> {
        let items = self.read()?;
        items
            .get(id)
            .cloned()
            .ok_or_else(|| Self::not_found(id).into())
    }

    async fn create(&self, mut entity: T) -> DeskResult<T> {
        let id = RecordId::generate();
        entity.set_id(id.clone());

        let mut items = self.write()?;
        items.insert(id.clone(), entity.clone());
        tracing::debug!(kind = T::resource_name_singular(), id = %id, "created");

        Ok(entity)
    }

    async fn update(&self, id: &RecordId, mut entity: T) -> DeskResult<T> {
        let mut items = self.write()?;
        let slot = items.get_mut(id).ok_or_else(|| Self::not_found(id))?;

        entity.set_id(id.clone());
        *slot = entity.clone();

        Ok(entity)
    }

    async fn delete(&self, id: &RecordId) -> DeskResult<()> {
        let mut items = self.write()?;
        items
            .shift_remove(id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(id).into())
    }
}
