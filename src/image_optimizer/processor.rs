//! Transform capability
//!
//! The proxy talks to a [`Transformer`]; [`ImageTransformer`] is the built-in
//! implementation: decode → resize → (crop) → encode.

use std::io::Cursor;
use std::num::NonZeroU32;

use async_trait::async_trait;
use bytes::Bytes;
use fast_image_resize::{FilterType, Image, PixelType, ResizeAlg, Resizer};
use image::io::Reader as ImageReader;
use image::DynamicImage;

use crate::config::TransformConfig;
use crate::constants::{
    MAX_OUTPUT_DIMENSION, MAX_OUTPUT_PIXELS, MAX_SOURCE_DIMENSION, MAX_SOURCE_PIXELS,
};

use super::encoder::{encoder_for, OutputFormat};
use super::error::ImageError;
use super::options::{FitMode, TransformOptions};

/// External transform capability: bytes in, transformed bytes out.
#[async_trait]
pub trait Transformer: Send + Sync {
    async fn transform(&self, input: Bytes, options: &TransformOptions)
        -> Result<Bytes, ImageError>;
}

/// Built-in transformer backed by the image and fast_image_resize crates
#[derive(Debug, Clone)]
pub struct ImageTransformer {
    default_quality: u8,
    max_input_bytes: usize,
}

impl ImageTransformer {
    pub fn new(config: &TransformConfig) -> Self {
        Self {
            default_quality: config.default_quality,
            max_input_bytes: config.max_input_bytes,
        }
    }
}

impl Default for ImageTransformer {
    fn default() -> Self {
        Self::new(&TransformConfig::default())
    }
}

#[async_trait]
impl Transformer for ImageTransformer {
    async fn transform(
        &self,
        input: Bytes,
        options: &TransformOptions,
    ) -> Result<Bytes, ImageError> {
        if input.len() > self.max_input_bytes {
            return Err(ImageError::FileTooLarge {
                size: input.len(),
                max_size: self.max_input_bytes,
            });
        }

        let options = options.clone();
        let default_quality = self.default_quality;

        // decoding and resizing are CPU bound
        tokio::task::spawn_blocking(move || process_image(&input, &options, default_quality))
            .await
            .map_err(|e| ImageError::WorkerFailed {
                message: e.to_string(),
            })?
            .map(Bytes::from)
    }
}

/// Run the full transform synchronously
pub fn process_image(
    data: &[u8],
    options: &TransformOptions,
    default_quality: u8,
) -> Result<Vec<u8>, ImageError> {
    // Fail on the requested format before doing any pixel work
    let output_format = match &options.format {
        Some(format) => format.parse::<OutputFormat>()?,
        None => OutputFormat::from_source(data),
    };

    // Header-only read, so oversized sources are rejected before decoding
    let (src_w, src_h) = source_dimensions(data)?;
    validate_source_dimensions(src_w, src_h)?;
    let plan = plan_fit(src_w, src_h, options)?;

    let img = decode_image(data)?;
    let processed = match plan {
        Some(plan) => apply_plan(img, plan)?,
        None => img,
    };

    let quality = options
        .quality
        .map(|q| q.clamp(1, 100) as u8)
        .unwrap_or(default_quality);

    encoder_for(output_format).encode(&processed, quality)
}

/// Read width and height from the image header
fn source_dimensions(data: &[u8]) -> Result<(u32, u32), ImageError> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ImageError::decode_failed(e.to_string()))?
        .into_dimensions()
        .map_err(|e| ImageError::decode_failed(e.to_string()))
}

/// Reject sources whose decoded buffer would be unreasonably large
fn validate_source_dimensions(width: u32, height: u32) -> Result<(), ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::decode_failed(format!(
            "source has empty dimensions {}x{}",
            width, height
        )));
    }

    let pixels = u64::from(width) * u64::from(height);
    if width > MAX_SOURCE_DIMENSION || height > MAX_SOURCE_DIMENSION || pixels > MAX_SOURCE_PIXELS
    {
        return Err(ImageError::ImageBombDetected {
            width,
            height,
            pixels,
            max_pixels: MAX_SOURCE_PIXELS,
        });
    }
    Ok(())
}

/// Geometry of one fit: an optional source crop, then a resize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FitPlan {
    /// `(x, y, width, height)` of the source region to keep
    crop: Option<(u32, u32, u32, u32)>,
    width: u32,
    height: u32,
}

/// Compute the output geometry and check it against the output limits.
///
/// Returns `None` when no dimension was requested. Cover crops the source
/// to the target aspect ratio first, so no buffer larger than the output is
/// ever allocated.
fn plan_fit(
    src_w: u32,
    src_h: u32,
    options: &TransformOptions,
) -> Result<Option<FitPlan>, ImageError> {
    if options.width.is_some_and(|w| w < 1) || options.height.is_some_and(|h| h < 1) {
        return Err(ImageError::invalid_dimensions(
            options.width.unwrap_or(i64::from(src_w)),
            options.height.unwrap_or(i64::from(src_h)),
            "width and height must be positive",
        ));
    }

    let (sw, sh) = (src_w as f64, src_h as f64);
    let (out_w, out_h, crop) = match (options.width, options.height) {
        (Some(w), None) => (w as u64, scale_side(sh, w as f64 / sw), None),
        (None, Some(h)) => (scale_side(sw, h as f64 / sh), h as u64, None),
        (Some(w), Some(h)) => match options.fit {
            FitMode::Contain => {
                let scale = (w as f64 / sw).min(h as f64 / sh);
                (scale_side(sw, scale), scale_side(sh, scale), None)
            }
            FitMode::Cover => (w as u64, h as u64, Some(cover_crop(src_w, src_h, w, h))),
        },
        (None, None) => return Ok(None),
    };

    let pixels = out_w.saturating_mul(out_h);
    let max_side = u64::from(MAX_OUTPUT_DIMENSION);
    if out_w > max_side || out_h > max_side || pixels > MAX_OUTPUT_PIXELS {
        return Err(ImageError::invalid_dimensions(
            i64::try_from(out_w).unwrap_or(i64::MAX),
            i64::try_from(out_h).unwrap_or(i64::MAX),
            format!(
                "output must be at most {} per side and {} pixels",
                MAX_OUTPUT_DIMENSION, MAX_OUTPUT_PIXELS
            ),
        ));
    }

    Ok(Some(FitPlan {
        crop,
        width: out_w as u32,
        height: out_h as u32,
    }))
}

/// Scaled side length, at least 1; float-to-int casts saturate
fn scale_side(side: f64, scale: f64) -> u64 {
    ((side * scale).round() as u64).max(1)
}

/// Centered source region with the aspect ratio of `w` x `h`
fn cover_crop(src_w: u32, src_h: u32, w: i64, h: i64) -> (u32, u32, u32, u32) {
    let target_ratio = w as f64 / h as f64;
    let (crop_w, crop_h) = if (src_w as f64 / src_h as f64) > target_ratio {
        let crop_w = ((src_h as f64 * target_ratio).round() as u32).clamp(1, src_w);
        (crop_w, src_h)
    } else {
        let crop_h = ((src_w as f64 / target_ratio).round() as u32).clamp(1, src_h);
        (src_w, crop_h)
    };
    ((src_w - crop_w) / 2, (src_h - crop_h) / 2, crop_w, crop_h)
}

fn apply_plan(img: DynamicImage, plan: FitPlan) -> Result<DynamicImage, ImageError> {
    let img = match plan.crop {
        Some((x, y, w, h)) => img.crop_imm(x, y, w, h),
        None => img,
    };
    resize_image(&img, plan.width, plan.height)
}

/// Decode image data into a DynamicImage
fn decode_image(data: &[u8]) -> Result<DynamicImage, ImageError> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ImageError::decode_failed(e.to_string()))?
        .decode()
        .map_err(|e| ImageError::decode_failed(e.to_string()))
}

/// Resize image using fast-image-resize with Lanczos3 filter
fn resize_image(
    img: &DynamicImage,
    target_w: u32,
    target_h: u32,
) -> Result<DynamicImage, ImageError> {
    if img.width() == target_w && img.height() == target_h {
        return Ok(img.clone());
    }

    let src_width =
        NonZeroU32::new(img.width()).ok_or_else(|| ImageError::resize_failed("Source width is 0"))?;
    let src_height = NonZeroU32::new(img.height())
        .ok_or_else(|| ImageError::resize_failed("Source height is 0"))?;
    let dst_width =
        NonZeroU32::new(target_w).ok_or_else(|| ImageError::resize_failed("Target width is 0"))?;
    let dst_height =
        NonZeroU32::new(target_h).ok_or_else(|| ImageError::resize_failed("Target height is 0"))?;

    let src_image = Image::from_vec_u8(
        src_width,
        src_height,
        img.to_rgba8().into_raw(),
        PixelType::U8x4,
    )
    .map_err(|e| ImageError::resize_failed(format!("Failed to create source image: {:?}", e)))?;

    let mut dst_image = Image::new(dst_width, dst_height, PixelType::U8x4);
    let mut resizer = Resizer::new(ResizeAlg::Convolution(FilterType::Lanczos3));

    resizer
        .resize(&src_image.view(), &mut dst_image.view_mut())
        .map_err(|e| ImageError::resize_failed(format!("Resize operation failed: {:?}", e)))?;

    let rgba_image = image::RgbaImage::from_raw(target_w, target_h, dst_image.into_vec())
        .ok_or_else(|| ImageError::resize_failed("Failed to create output image buffer"))?;

    Ok(DynamicImage::ImageRgba8(rgba_image))
}
