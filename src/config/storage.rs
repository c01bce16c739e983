//! Object store configuration types.
//!
//! One S3 (or S3-compatible) bucket holds every original. Keys are the
//! request path minus its leading `/`.
//!
//! Credentials are optional: when both `access_key` and `secret_key` are
//! omitted, the standard AWS environment variables are used instead.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_REGION, DEFAULT_S3_TIMEOUT_SECS};

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_s3_timeout() -> u64 {
    DEFAULT_S3_TIMEOUT_SECS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom endpoint for S3-compatible stores (MinIO, R2, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    /// Address buckets as `endpoint/bucket` instead of `bucket.endpoint`
    #[serde(default)]
    pub force_path_style: bool,
    /// Per-operation timeout in seconds (default: 20)
    #[serde(default = "default_s3_timeout")]
    pub timeout: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            region: default_region(),
            endpoint: None,
            access_key: None,
            secret_key: None,
            force_path_style: false,
            timeout: default_s3_timeout(),
        }
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.bucket.trim().is_empty() {
            return Err("storage.bucket cannot be empty".to_string());
        }

        if self.region.trim().is_empty() {
            return Err("storage.region cannot be empty".to_string());
        }

        if let Some(endpoint) = &self.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(format!(
                    "storage.endpoint '{}' must start with http:// or https://",
                    endpoint
                ));
            }
        }

        if self.access_key.is_some() != self.secret_key.is_some() {
            return Err(
                "storage.access_key and storage.secret_key must be set together".to_string(),
            );
        }

        if self.timeout == 0 {
            return Err("storage.timeout must be > 0 seconds".to_string());
        }

        Ok(())
    }
}
