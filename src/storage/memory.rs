// In-memory object store
// Backs tests and local development runs without an S3 endpoint

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;

use super::{ObjectStore, StorageError, StoredObject};

#[derive(Debug, Clone)]
struct MemoryObject {
    data: Bytes,
    content_type: Option<String>,
}

/// Thread-safe in-memory key/value store
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<String, MemoryObject>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object, replacing any previous value under `key`
    pub fn insert(&self, key: impl Into<String>, data: impl Into<Bytes>, content_type: Option<&str>) {
        self.objects.write().insert(
            key.into(),
            MemoryObject {
                data: data.into(),
                content_type: content_type.map(str::to_string),
            },
        );
    }

    pub fn remove(&self, key: &str) -> bool {
        self.objects.write().remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get(&self, key: &str) -> Result<Option<StoredObject>, StorageError> {
        let Some(object) = self.objects.read().get(key).cloned() else {
            return Ok(None);
        };

        let mut stored = StoredObject::from_bytes(object.data);
        if let Some(content_type) = object.content_type {
            stored = stored.with_content_type(content_type);
        }
        Ok(Some(stored))
    }
}
