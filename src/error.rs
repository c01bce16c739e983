// Error types module

use thiserror::Error;

use crate::image_optimizer::{ImageError, SpecError};
use crate::storage::StorageError;

/// Centralized error type for the request pipeline
///
/// Every failure a request can hit collapses into one of three categories,
/// each with a fixed HTTP status and a fixed public message. Internal detail
/// is kept for logging and never sent to the client.
#[derive(Debug, Clone, Error)]
pub enum ProxyError {
    /// The imageView2 spec string was empty or structurally unusable
    #[error("invalid imageView2 spec: {0}")]
    InvalidSpec(String),

    /// The object store has no object under the requested key
    #[error("object not found: {key}")]
    NotFound { key: String },

    /// Storage, transform or any other unexpected failure
    #[error("upstream failure: {0}")]
    Upstream(String),
}

impl ProxyError {
    /// Maps errors to HTTP status codes
    ///
    /// - InvalidSpec → 400 (Bad Request)
    /// - NotFound → 404 (Not Found)
    /// - Upstream → 500 (Internal Server Error)
    pub fn status_code(&self) -> u16 {
        match self {
            ProxyError::InvalidSpec(_) => 400,
            ProxyError::NotFound { .. } => 404,
            ProxyError::Upstream(_) => 500,
        }
    }

    /// Short literal body sent to the client
    pub fn public_message(&self) -> &'static str {
        match self {
            ProxyError::InvalidSpec(_) => "Invalid imageView2 parameters",
            ProxyError::NotFound { .. } => "Image not found",
            ProxyError::Upstream(_) => "Internal Server Error",
        }
    }

    /// Label used for the outcome dimension of request metrics
    pub fn outcome(&self) -> &'static str {
        match self {
            ProxyError::InvalidSpec(_) => "invalid_spec",
            ProxyError::NotFound { .. } => "not_found",
            ProxyError::Upstream(_) => "upstream_error",
        }
    }

    pub fn not_found(key: impl Into<String>) -> Self {
        ProxyError::NotFound { key: key.into() }
    }
}

impl From<SpecError> for ProxyError {
    fn from(err: SpecError) -> Self {
        ProxyError::InvalidSpec(err.to_string())
    }
}

impl From<StorageError> for ProxyError {
    fn from(err: StorageError) -> Self {
        ProxyError::Upstream(format!("storage: {}", err))
    }
}

impl From<ImageError> for ProxyError {
    fn from(err: ImageError) -> Self {
        ProxyError::Upstream(format!("transform: {}", err))
    }
}
