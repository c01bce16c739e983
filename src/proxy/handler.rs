//! Request handling: extract → parse → map → fetch → (transform) → respond.

use std::time::Instant;

use crate::constants::DEFAULT_CONTENT_TYPE;
use crate::error::ProxyError;
use crate::image_optimizer::{extract_spec, ParsedSpec, TransformOptions};
use crate::metrics::ProxyMetrics;
use crate::pipeline::{RequestContext, RequestKind};

use super::response::ProxyResponse;
use super::ImageViewProxy;

impl ImageViewProxy {
    /// Handle one request for the object at `key`.
    ///
    /// Never fails: every error is logged and turned into its fixed status
    /// and message. The request kind and outcome are recorded on `ctx`.
    pub async fn handle(
        &self,
        ctx: &mut RequestContext,
        key: &str,
        query_pairs: &[(String, String)],
    ) -> ProxyResponse {
        ctx.set_path(key);

        match self.try_handle(ctx, key, query_pairs).await {
            Ok(response) => {
                ctx.set_outcome("ok");
                response
            }
            Err(err) => {
                match err.status_code() {
                    500 => tracing::error!(
                        request_id = %ctx.request_id(),
                        key = %key,
                        error = %err,
                        "Request failed"
                    ),
                    404 => tracing::debug!(
                        request_id = %ctx.request_id(),
                        key = %key,
                        "Object not found"
                    ),
                    _ => tracing::warn!(
                        request_id = %ctx.request_id(),
                        key = %key,
                        error = %err,
                        "Rejected imageView2 request"
                    ),
                }
                ctx.set_outcome(err.outcome());
                ProxyResponse::from_error(&err)
            }
        }
    }

    async fn try_handle(
        &self,
        ctx: &mut RequestContext,
        key: &str,
        query_pairs: &[(String, String)],
    ) -> Result<ProxyResponse, ProxyError> {
        match extract_spec(query_pairs) {
            None => {
                ctx.set_kind(RequestKind::Passthrough);
                self.passthrough(key).await
            }
            Some(spec) => {
                ctx.set_kind(RequestKind::Transform);
                self.transform(ctx, key, &spec).await
            }
        }
    }

    async fn passthrough(&self, key: &str) -> Result<ProxyResponse, ProxyError> {
        let object = self
            .store
            .get(key)
            .await?
            .ok_or_else(|| ProxyError::not_found(key))?;

        let content_type = object
            .content_type
            .clone()
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        Ok(ProxyResponse::stream(content_type, object))
    }

    async fn transform(
        &self,
        ctx: &RequestContext,
        key: &str,
        spec: &str,
    ) -> Result<ProxyResponse, ProxyError> {
        // Parse before fetching so a malformed spec never touches the store
        let parsed = ParsedSpec::parse(spec)?;
        let options = TransformOptions::from_spec(&parsed);

        let object = self
            .store
            .get(key)
            .await?
            .ok_or_else(|| ProxyError::not_found(key))?;
        let original = object.bytes().await?;

        tracing::debug!(
            request_id = %ctx.request_id(),
            key = %key,
            spec = %spec,
            fit = %options.fit,
            width = ?options.width,
            height = ?options.height,
            format = ?options.format,
            original_bytes = original.len(),
            "Transforming image"
        );

        let started = Instant::now();
        let transformed = self.transformer.transform(original, &options).await?;
        ProxyMetrics::global().record_transform(started.elapsed());

        Ok(ProxyResponse::full(options.content_type(), transformed))
    }
}
