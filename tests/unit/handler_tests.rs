// End-to-end request handling against in-memory collaborators

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use parking_lot::Mutex;

use imageview_proxy::image_optimizer::{FitMode, ImageError, TransformOptions, Transformer};
use imageview_proxy::pipeline::{RequestContext, RequestKind};
use imageview_proxy::proxy::helpers::parse_query_pairs;
use imageview_proxy::proxy::{ImageViewProxy, ProxyResponse, ResponseBody};
use imageview_proxy::storage::{MemoryObjectStore, ObjectStore, StorageError, StoredObject};

/// Returns a fixed body and remembers every call
#[derive(Default)]
struct RecordingTransformer {
    calls: Mutex<Vec<(Bytes, TransformOptions)>>,
}

#[async_trait]
impl Transformer for RecordingTransformer {
    async fn transform(
        &self,
        input: Bytes,
        options: &TransformOptions,
    ) -> Result<Bytes, ImageError> {
        self.calls.lock().push((input, options.clone()));
        Ok(Bytes::from_static(b"transformed"))
    }
}

struct FailingTransformer;

#[async_trait]
impl Transformer for FailingTransformer {
    async fn transform(&self, _: Bytes, _: &TransformOptions) -> Result<Bytes, ImageError> {
        Err(ImageError::decode_failed("corrupt header"))
    }
}

struct FailingStore;

#[async_trait]
impl ObjectStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<StoredObject>, StorageError> {
        Err(StorageError::Backend("connection refused".to_string()))
    }
}

/// Object whose body breaks after the first chunk
struct BrokenBodyStore;

#[async_trait]
impl ObjectStore for BrokenBodyStore {
    async fn get(&self, _key: &str) -> Result<Option<StoredObject>, StorageError> {
        let chunks = vec![
            Ok(Bytes::from_static(b"part")),
            Err(StorageError::Body("reset".to_string())),
        ];
        Ok(Some(StoredObject::new(stream::iter(chunks).boxed())))
    }
}

fn store_with_cat() -> Arc<MemoryObjectStore> {
    let store = MemoryObjectStore::new();
    store.insert("photos/cat.png", Bytes::from_static(b"original-png"), Some("image/png"));
    store.insert("raw/blob", Bytes::from_static(b"no-metadata"), None);
    Arc::new(store)
}

async fn request(
    proxy: &ImageViewProxy,
    key: &str,
    query: &str,
) -> (ProxyResponse, RequestContext) {
    let mut ctx = RequestContext::new();
    let pairs = parse_query_pairs(query);
    let response = proxy.handle(&mut ctx, key, &pairs).await;
    (response, ctx)
}

#[tokio::test]
async fn test_passthrough_streams_original_with_stored_type() {
    let transformer = Arc::new(RecordingTransformer::default());
    let proxy = ImageViewProxy::new(store_with_cat(), transformer.clone());

    let (response, ctx) = request(&proxy, "photos/cat.png", "").await;

    assert_eq!(response.status, 200);
    assert_eq!(response.content_type, "image/png");
    assert_eq!(response.cache_control, Some("public, max-age=31536000"));
    assert_eq!(response.content_length, Some(12));
    assert!(matches!(response.body, ResponseBody::Stream(_)));
    assert_eq!(response.into_bytes().await.unwrap(), Bytes::from_static(b"original-png"));

    assert_eq!(ctx.kind(), RequestKind::Passthrough);
    assert_eq!(ctx.outcome(), "ok");
    assert!(transformer.calls.lock().is_empty());
}

#[tokio::test]
async fn test_passthrough_defaults_to_jpeg_content_type() {
    let proxy = ImageViewProxy::new(store_with_cat(), Arc::new(RecordingTransformer::default()));

    let (response, _) = request(&proxy, "raw/blob", "v=2").await;

    assert_eq!(response.status, 200);
    assert_eq!(response.content_type, "image/jpeg");
}

#[tokio::test]
async fn test_missing_object_is_404_without_spec() {
    let proxy = ImageViewProxy::new(store_with_cat(), Arc::new(RecordingTransformer::default()));

    let (response, ctx) = request(&proxy, "photos/dog.png", "").await;

    assert_eq!(response.status, 404);
    assert_eq!(response.cache_control, None);
    assert_eq!(ctx.outcome(), "not_found");
    assert_eq!(response.into_bytes().await.unwrap(), Bytes::from_static(b"Image not found"));
}

#[tokio::test]
async fn test_missing_object_is_404_with_spec() {
    let transformer = Arc::new(RecordingTransformer::default());
    let proxy = ImageViewProxy::new(store_with_cat(), transformer.clone());

    let (response, ctx) = request(&proxy, "photos/dog.png", "imageView2=2/w/20").await;

    assert_eq!(response.status, 404);
    assert_eq!(ctx.kind(), RequestKind::Transform);
    assert!(transformer.calls.lock().is_empty());
}

#[tokio::test]
async fn test_transform_returns_transformed_bytes() {
    let transformer = Arc::new(RecordingTransformer::default());
    let proxy = ImageViewProxy::new(store_with_cat(), transformer.clone());

    let (response, ctx) = request(&proxy, "photos/cat.png", "imageView2=1/w/50/h/40").await;

    assert_eq!(response.status, 200);
    assert_eq!(response.content_type, "image/jpeg");
    assert_eq!(response.cache_control, Some("public, max-age=31536000"));
    assert_eq!(response.content_length, Some(11));
    assert!(matches!(response.body, ResponseBody::Full(_)));
    assert_eq!(response.into_bytes().await.unwrap(), Bytes::from_static(b"transformed"));
    assert_eq!(ctx.kind(), RequestKind::Transform);
    assert_eq!(ctx.outcome(), "ok");

    let calls = transformer.calls.lock();
    assert_eq!(calls.len(), 1);
    let (input, options) = &calls[0];
    assert_eq!(input, &Bytes::from_static(b"original-png"));
    assert_eq!(
        options,
        &TransformOptions {
            fit: FitMode::Cover,
            width: Some(50),
            height: Some(40),
            ..Default::default()
        }
    );
}

#[tokio::test]
async fn test_transform_content_type_follows_format() {
    let proxy = ImageViewProxy::new(store_with_cat(), Arc::new(RecordingTransformer::default()));

    let (response, _) = request(&proxy, "photos/cat.png", "imageView2/2/w/20/format/webp").await;

    assert_eq!(response.status, 200);
    assert_eq!(response.content_type, "image/webp");
}

#[tokio::test]
async fn test_both_encodings_produce_identical_transform() {
    let by_value = Arc::new(RecordingTransformer::default());
    let by_key = Arc::new(RecordingTransformer::default());
    let store = store_with_cat();

    let proxy = ImageViewProxy::new(store.clone(), by_value.clone());
    request(&proxy, "photos/cat.png", "imageView2=2/w/20/h/20").await;
    let proxy = ImageViewProxy::new(store, by_key.clone());
    request(&proxy, "photos/cat.png", "imageView2/2/w/20/h/20").await;

    assert_eq!(by_value.calls.lock()[0].1, by_key.calls.lock()[0].1);
}

#[tokio::test]
async fn test_empty_spec_is_400_before_fetch() {
    let proxy = ImageViewProxy::new(Arc::new(FailingStore), Arc::new(RecordingTransformer::default()));

    for query in ["imageView2/", "imageView2/="] {
        let (response, ctx) = request(&proxy, "photos/cat.png", query).await;
        assert_eq!(response.status, 400, "query {}", query);
        assert_eq!(ctx.outcome(), "invalid_spec");
        assert_eq!(
            response.into_bytes().await.unwrap(),
            Bytes::from_static(b"Invalid imageView2 parameters")
        );
    }
}

#[tokio::test]
async fn test_bare_spec_key_transforms_with_defaults() {
    for query in ["imageView2", "imageView2="] {
        let transformer = Arc::new(RecordingTransformer::default());
        let proxy = ImageViewProxy::new(store_with_cat(), transformer.clone());

        let (response, ctx) = request(&proxy, "photos/cat.png", query).await;

        assert_eq!(response.status, 200, "query {}", query);
        assert_eq!(response.content_type, "image/jpeg");
        assert_eq!(ctx.kind(), RequestKind::Transform);

        let calls = transformer.calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, TransformOptions::default());
    }
}

#[tokio::test]
async fn test_passthrough_empty_stored_type_falls_back_to_jpeg() {
    let store = MemoryObjectStore::new();
    store.insert("blank-type.png", Bytes::from_static(b"bytes"), Some(""));
    let proxy = ImageViewProxy::new(Arc::new(store), Arc::new(RecordingTransformer::default()));

    let (response, _) = request(&proxy, "blank-type.png", "").await;

    assert_eq!(response.status, 200);
    assert_eq!(response.content_type, "image/jpeg");
}

#[tokio::test]
async fn test_store_failure_is_500() {
    let proxy = ImageViewProxy::new(Arc::new(FailingStore), Arc::new(RecordingTransformer::default()));

    let (response, ctx) = request(&proxy, "photos/cat.png", "").await;
    assert_eq!(response.status, 500);
    assert_eq!(ctx.outcome(), "upstream_error");

    let (response, _) = request(&proxy, "photos/cat.png", "imageView2=2/w/10").await;
    assert_eq!(response.status, 500);
    assert_eq!(
        response.into_bytes().await.unwrap(),
        Bytes::from_static(b"Internal Server Error")
    );
}

#[tokio::test]
async fn test_transformer_failure_is_500() {
    let proxy = ImageViewProxy::new(store_with_cat(), Arc::new(FailingTransformer));

    let (response, ctx) = request(&proxy, "photos/cat.png", "imageView2=2/w/10").await;

    assert_eq!(response.status, 500);
    assert_eq!(response.content_type, "text/plain; charset=utf-8");
    assert_eq!(ctx.outcome(), "upstream_error");
}

#[tokio::test]
async fn test_broken_body_fails_transform_with_500() {
    let proxy = ImageViewProxy::new(Arc::new(BrokenBodyStore), Arc::new(RecordingTransformer::default()));

    let (response, _) = request(&proxy, "any", "imageView2=2/w/10").await;

    assert_eq!(response.status, 500);
}

#[tokio::test]
async fn test_request_context_records_key() {
    let proxy = ImageViewProxy::new(store_with_cat(), Arc::new(RecordingTransformer::default()));

    let (_, ctx) = request(&proxy, "photos/cat.png", "").await;

    assert_eq!(ctx.path(), "photos/cat.png");
}
