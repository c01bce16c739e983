// S3 object store
// Fetches originals with the AWS SDK; works against AWS and S3-compatible endpoints

use std::time::Duration;

use async_trait::async_trait;
use aws_config::environment::EnvironmentVariableCredentialsProvider;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::timeout::TimeoutConfig;
use aws_sdk_s3::config::{BehaviorVersion, Region};
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use futures::stream::{self, StreamExt};

use super::{ObjectBodyStream, ObjectStore, StorageError, StoredObject};
use crate::config::StorageConfig;

/// Object store backed by a single S3 bucket
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Build a client from storage configuration.
    ///
    /// Static credentials are used when both keys are configured; otherwise
    /// credentials come from the `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`
    /// environment variables.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let timeouts = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(config.timeout))
            .build();

        let mut builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .force_path_style(config.force_path_style)
            .timeout_config(timeouts);

        builder = match (&config.access_key, &config.secret_key) {
            (Some(access_key), Some(secret_key)) => builder.credentials_provider(Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "imageview-proxy-config",
            )),
            (None, None) => {
                builder.credentials_provider(EnvironmentVariableCredentialsProvider::new())
            }
            _ => {
                return Err(StorageError::Config(
                    "access_key and secret_key must be set together".to_string(),
                ))
            }
        };

        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        Ok(Self::from_client(Client::from_conf(builder.build()), &config.bucket))
    }

    pub fn from_client(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get(&self, key: &str) -> Result<Option<StoredObject>, StorageError> {
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(SdkError::ServiceError(err))
                if err.err().is_no_such_key() || err.raw().status().as_u16() == 404 =>
            {
                tracing::debug!(bucket = %self.bucket, key = %key, "S3 object not found");
                return Ok(None);
            }
            Err(err) => {
                return Err(StorageError::Backend(format!(
                    "GetObject s3://{}/{} failed: {}",
                    self.bucket,
                    key,
                    DisplayErrorContext(&err)
                )));
            }
        };

        let content_type = output.content_type().map(str::to_string);
        let content_length = output.content_length().and_then(|len| u64::try_from(len).ok());

        let mut object = StoredObject::new(body_stream(output.body));
        if let Some(content_type) = content_type {
            object = object.with_content_type(content_type);
        }
        if let Some(length) = content_length {
            object = object.with_content_length(length);
        }
        Ok(Some(object))
    }
}

fn body_stream(body: ByteStream) -> ObjectBodyStream {
    stream::unfold(body, |mut body| async move {
        body.next().await.map(|chunk| {
            (
                chunk.map_err(|e| StorageError::Body(e.to_string())),
                body,
            )
        })
    })
    .boxed()
}
