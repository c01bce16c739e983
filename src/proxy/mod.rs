// Proxy module - Pingora ProxyHttp implementation
// Answers every request from the object store; no upstream peer is ever selected

mod handler;
pub mod helpers;
pub mod response;

use async_trait::async_trait;
use futures::StreamExt;
use pingora_core::upstreams::peer::HttpPeer;
use pingora_core::Result;
use pingora_http::ResponseHeader;
use pingora_proxy::{ProxyHttp, Session};
use std::sync::Arc;

use crate::config::Config;
use crate::constants::REQUEST_ID_HEADER;
use crate::image_optimizer::{ImageTransformer, Transformer};
use crate::metrics::ProxyMetrics;
use crate::pipeline::{RequestContext, RequestKind};
use crate::storage::{ObjectStore, S3ObjectStore, StorageError};

pub use response::{ProxyResponse, ResponseBody};

/// ImageViewProxy implements the Pingora ProxyHttp trait
/// Serves originals and imageView2 renditions from one object store
pub struct ImageViewProxy {
    store: Arc<dyn ObjectStore>,
    transformer: Arc<dyn Transformer>,
}

impl ImageViewProxy {
    pub fn new(store: Arc<dyn ObjectStore>, transformer: Arc<dyn Transformer>) -> Self {
        Self { store, transformer }
    }

    /// Create an ImageViewProxy backed by S3 and the built-in transformer
    pub fn from_config(config: &Config) -> std::result::Result<Self, StorageError> {
        let store = S3ObjectStore::from_config(&config.storage)?;
        let transformer = ImageTransformer::new(&config.transform);

        tracing::info!(
            bucket = %store.bucket(),
            region = %config.storage.region,
            endpoint = ?config.storage.endpoint,
            "Object store configured"
        );

        Ok(Self::new(Arc::new(store), Arc::new(transformer)))
    }

    /// Write a handler response to the client.
    ///
    /// A stream error after the headers went out cannot be reported with a
    /// status; the connection is aborted instead.
    async fn write_response(
        session: &mut Session,
        ctx: &mut RequestContext,
        response: ProxyResponse,
    ) -> Result<()> {
        let mut header = ResponseHeader::build(response.status, None)?;
        header.insert_header("Content-Type", response.content_type.as_str())?;
        if let Some(cache_control) = response.cache_control {
            header.insert_header("Cache-Control", cache_control)?;
        }
        if let Some(length) = response.content_length {
            header.insert_header("Content-Length", length.to_string())?;
        }
        header.insert_header(REQUEST_ID_HEADER, ctx.request_id())?;

        session
            .write_response_header(Box::new(header), false)
            .await?;

        match response.body {
            ResponseBody::Full(body) => {
                session.write_response_body(Some(body), true).await?;
            }
            ResponseBody::Stream(mut stream) => {
                while let Some(chunk) = stream.next().await {
                    match chunk {
                        Ok(chunk) => session.write_response_body(Some(chunk), false).await?,
                        Err(e) => {
                            tracing::error!(
                                request_id = %ctx.request_id(),
                                key = %ctx.path(),
                                error = %e,
                                "Object body stream failed mid-response"
                            );
                            ctx.set_outcome("upstream_error");
                            return Err(pingora_core::Error::explain(
                                pingora_core::ErrorType::ReadError,
                                format!("object body stream failed: {}", e),
                            ));
                        }
                    }
                }
                session.write_response_body(None, true).await?;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl ProxyHttp for ImageViewProxy {
    type CTX = RequestContext;

    /// Create a new request context for each incoming request
    fn new_ctx(&self) -> Self::CTX {
        RequestContext::new()
    }

    async fn upstream_peer(
        &self,
        _session: &mut Session,
        _ctx: &mut Self::CTX,
    ) -> Result<Box<HttpPeer>> {
        Err(pingora_core::Error::explain(
            pingora_core::ErrorType::InternalError,
            "requests are answered in request_filter",
        ))
    }

    /// Serve the request from the object store
    async fn request_filter(&self, session: &mut Session, ctx: &mut Self::CTX) -> Result<bool> {
        let req = session.req_header();
        let key = helpers::object_key(req.uri.path());
        let query_pairs = helpers::extract_query_pairs(req);

        let response = self.handle(ctx, &key, &query_pairs).await;
        Self::write_response(session, ctx, response).await?;

        Ok(true)
    }

    async fn logging(
        &self,
        session: &mut Session,
        _e: Option<&pingora_core::Error>,
        ctx: &mut Self::CTX,
    ) {
        let status_code = session
            .response_written()
            .map(|resp| resp.status.as_u16())
            .unwrap_or(500);
        let elapsed = ctx.elapsed();

        ProxyMetrics::global().record_request(ctx.outcome(), ctx.kind().as_str(), elapsed);

        tracing::info!(
            request_id = %ctx.request_id(),
            path = %ctx.path(),
            status = status_code,
            transform = ctx.kind() == RequestKind::Transform,
            outcome = ctx.outcome(),
            duration_ms = elapsed.as_millis() as u64,
            "Request completed"
        );
    }
}
