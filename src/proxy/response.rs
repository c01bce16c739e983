//! Response envelope produced by the request handler.
//!
//! The handler returns a [`ProxyResponse`] instead of writing to the Pingora
//! session directly, which keeps the request flow testable without a
//! listener. The `ProxyHttp` hook turns it into headers and body writes.

use std::fmt;

use bytes::Bytes;
use futures::StreamExt;

use crate::constants::{CACHE_CONTROL_VALUE, ERROR_CONTENT_TYPE};
use crate::error::ProxyError;
use crate::storage::{ObjectBodyStream, StorageError, StoredObject};

/// Response body, either already in memory or streamed from the store.
pub enum ResponseBody {
    Full(Bytes),
    Stream(ObjectBodyStream),
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Full(bytes) => f.debug_tuple("Full").field(&bytes.len()).finish(),
            ResponseBody::Stream(_) => f.write_str("Stream"),
        }
    }
}

#[derive(Debug)]
pub struct ProxyResponse {
    pub status: u16,
    pub content_type: String,
    /// `Cache-Control` value, set on successful responses only
    pub cache_control: Option<&'static str>,
    /// Known body length; unset for streams of unknown size
    pub content_length: Option<u64>,
    pub body: ResponseBody,
}

impl ProxyResponse {
    /// 200 response streaming a stored object
    pub fn stream(content_type: impl Into<String>, object: StoredObject) -> Self {
        let content_length = object.content_length;
        Self {
            status: 200,
            content_type: content_type.into(),
            cache_control: Some(CACHE_CONTROL_VALUE),
            content_length,
            body: ResponseBody::Stream(object.into_stream()),
        }
    }

    /// 200 response with an in-memory body
    pub fn full(content_type: impl Into<String>, body: Bytes) -> Self {
        Self {
            status: 200,
            content_type: content_type.into(),
            cache_control: Some(CACHE_CONTROL_VALUE),
            content_length: Some(body.len() as u64),
            body: ResponseBody::Full(body),
        }
    }

    /// Error response with the fixed public message for `err`
    pub fn from_error(err: &ProxyError) -> Self {
        let body = Bytes::from_static(err.public_message().as_bytes());
        Self {
            status: err.status_code(),
            content_type: ERROR_CONTENT_TYPE.to_string(),
            cache_control: None,
            content_length: Some(body.len() as u64),
            body: ResponseBody::Full(body),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Collect the whole body, draining the stream if necessary
    pub async fn into_bytes(self) -> Result<Bytes, StorageError> {
        match self.body {
            ResponseBody::Full(bytes) => Ok(bytes),
            ResponseBody::Stream(mut stream) => {
                let mut buf = Vec::new();
                while let Some(chunk) = stream.next().await {
                    buf.extend_from_slice(&chunk?);
                }
                Ok(Bytes::from(buf))
            }
        }
    }
}
