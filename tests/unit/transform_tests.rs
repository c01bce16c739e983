// Built-in transformer driven through the proxy

use std::io::Cursor;
use std::sync::Arc;

use bytes::Bytes;
use image::{DynamicImage, GenericImageView, ImageFormat};

use imageview_proxy::config::TransformConfig;
use imageview_proxy::image_optimizer::ImageTransformer;
use imageview_proxy::pipeline::RequestContext;
use imageview_proxy::proxy::helpers::parse_query_pairs;
use imageview_proxy::proxy::ImageViewProxy;
use imageview_proxy::storage::MemoryObjectStore;

fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(width, height, |x, _| {
        if x % 2 == 0 {
            image::Rgba([0, 128, 255, 255])
        } else {
            image::Rgba([255, 255, 0, 255])
        }
    });
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut buffer, ImageFormat::Png)
        .unwrap();
    buffer.into_inner()
}

fn proxy_with(key: &str, data: Vec<u8>, config: TransformConfig) -> ImageViewProxy {
    let store = MemoryObjectStore::new();
    store.insert(key, data, Some("image/png"));
    ImageViewProxy::new(Arc::new(store), Arc::new(ImageTransformer::new(&config)))
}

async fn get(proxy: &ImageViewProxy, key: &str, query: &str) -> (u16, String, Bytes) {
    let mut ctx = RequestContext::new();
    let response = proxy.handle(&mut ctx, key, &parse_query_pairs(query)).await;
    let status = response.status;
    let content_type = response.content_type.clone();
    (status, content_type, response.into_bytes().await.unwrap())
}

#[tokio::test]
async fn test_cover_crops_to_exact_box() {
    let proxy = proxy_with("a.png", create_test_png(60, 30), TransformConfig::default());

    let (status, content_type, body) = get(&proxy, "a.png", "imageView2=1/w/20/h/20/format/png").await;

    assert_eq!(status, 200);
    assert_eq!(content_type, "image/png");
    let img = image::load_from_memory(&body).unwrap();
    assert_eq!(img.dimensions(), (20, 20));
}

#[tokio::test]
async fn test_contain_keeps_aspect_ratio() {
    let proxy = proxy_with("a.png", create_test_png(60, 30), TransformConfig::default());

    let (status, _, body) = get(&proxy, "a.png", "imageView2/2/w/20/h/20/format/png").await;

    assert_eq!(status, 200);
    let img = image::load_from_memory(&body).unwrap();
    assert_eq!(img.dimensions(), (20, 10));
}

#[tokio::test]
async fn test_without_format_response_is_labelled_jpeg() {
    let proxy = proxy_with("a.png", create_test_png(16, 16), TransformConfig::default());

    let (status, content_type, body) = get(&proxy, "a.png", "imageView2=2/w/8/format/jpg").await;

    assert_eq!(status, 200);
    assert_eq!(content_type, "image/jpg");
    assert_eq!(image::guess_format(&body).unwrap(), ImageFormat::Jpeg);

    let (status, content_type, _) = get(&proxy, "a.png", "imageView2=2/w/8").await;
    assert_eq!(status, 200);
    assert_eq!(content_type, "image/jpeg");
}

#[tokio::test]
async fn test_tall_original_with_width_only_is_500() {
    let proxy = proxy_with("tall.png", create_test_png(1, 200), TransformConfig::default());

    let (status, _, body) = get(&proxy, "tall.png", "imageView2/2/w/100").await;

    assert_eq!(status, 500);
    assert_eq!(body, Bytes::from_static(b"Internal Server Error"));
}

#[tokio::test]
async fn test_bare_spec_key_re_encodes_original() {
    let proxy = proxy_with("a.png", create_test_png(12, 6), TransformConfig::default());

    let (status, content_type, body) = get(&proxy, "a.png", "imageView2").await;

    assert_eq!(status, 200);
    assert_eq!(content_type, "image/jpeg");
    let img = image::load_from_memory(&body).unwrap();
    assert_eq!(img.dimensions(), (12, 6));
}

#[tokio::test]
async fn test_unsupported_output_format_is_500() {
    let proxy = proxy_with("a.png", create_test_png(8, 8), TransformConfig::default());

    let (status, _, _) = get(&proxy, "a.png", "imageView2=2/w/4/format/tiff").await;

    assert_eq!(status, 500);
}

#[tokio::test]
async fn test_oversized_original_is_500() {
    let config = TransformConfig {
        max_input_bytes: 16,
        ..Default::default()
    };
    let proxy = proxy_with("a.png", create_test_png(32, 32), config);

    let (status, _, _) = get(&proxy, "a.png", "imageView2=2/w/4").await;
    assert_eq!(status, 500);

    // passthrough is not subject to the transform limit
    let (status, _, _) = get(&proxy, "a.png", "").await;
    assert_eq!(status, 200);
}
