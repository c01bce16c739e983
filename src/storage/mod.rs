//! Object store abstraction
//!
//! The proxy reads originals through the [`ObjectStore`] trait. Two
//! implementations ship with the crate:
//! - [`S3ObjectStore`] for S3 and S3-compatible services
//! - [`MemoryObjectStore`] for tests and local runs

mod memory;
mod s3;

use std::fmt;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use thiserror::Error;

pub use memory::MemoryObjectStore;
pub use s3::S3ObjectStore;

/// Errors raised by object store implementations
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// Backend request failed (network, auth, throttling, ...)
    #[error("backend request failed: {0}")]
    Backend(String),

    /// Body stream broke while reading
    #[error("failed to read object body: {0}")]
    Body(String),

    /// Store could not be constructed from configuration
    #[error("invalid storage configuration: {0}")]
    Config(String),
}

/// Chunked object body
pub type ObjectBodyStream = BoxStream<'static, Result<Bytes, StorageError>>;

/// An object returned by the store
pub struct StoredObject {
    /// Stored Content-Type metadata, if any
    pub content_type: Option<String>,
    /// Size in bytes when the store reports it
    pub content_length: Option<u64>,
    body: ObjectBodyStream,
}

impl StoredObject {
    pub fn new(body: ObjectBodyStream) -> Self {
        Self {
            content_type: None,
            content_length: None,
            body,
        }
    }

    /// Object whose body is already in memory
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        let data = data.into();
        let length = data.len() as u64;
        Self::new(stream::once(async move { Ok(data) }).boxed()).with_content_length(length)
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_content_length(mut self, length: u64) -> Self {
        self.content_length = Some(length);
        self
    }

    /// Consume the object as a chunk stream
    pub fn into_stream(self) -> ObjectBodyStream {
        self.body
    }

    /// Read the whole body into one buffer
    pub async fn bytes(self) -> Result<Bytes, StorageError> {
        let capacity = self.content_length.unwrap_or(0) as usize;
        self.body
            .try_fold(BytesMut::with_capacity(capacity), |mut acc, chunk| async move {
                acc.extend_from_slice(&chunk);
                Ok(acc)
            })
            .await
            .map(BytesMut::freeze)
    }
}

impl fmt::Debug for StoredObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredObject")
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Key/value blob storage holding original images
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch an object by key.
    ///
    /// Returns `Ok(None)` when the key does not exist; every other failure is
    /// an error.
    async fn get(&self, key: &str) -> Result<Option<StoredObject>, StorageError>;
}
