//! Image encoders used by the built-in transformer
//!
//! Each encoder takes a decoded image and produces the bytes of one output
//! format. Quality only affects lossy formats.

use std::io::Cursor;
use std::str::FromStr;

use image::{ColorType, DynamicImage, ImageEncoder as _};

use super::error::ImageError;

/// Output image format of the built-in transformer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }

    /// Map the detected source format, falling back to JPEG
    pub fn from_source(data: &[u8]) -> Self {
        match image::guess_format(data) {
            Ok(image::ImageFormat::Png) => OutputFormat::Png,
            Ok(image::ImageFormat::WebP) => OutputFormat::WebP,
            _ => OutputFormat::Jpeg,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::WebP),
            _ => Err(ImageError::unsupported_format(s)),
        }
    }
}

/// Trait for image encoders
pub trait ImageEncoder: Send + Sync {
    /// The output format this encoder produces
    fn format(&self) -> OutputFormat;

    /// Encode a decoded image; `quality` is 1-100
    fn encode(&self, img: &DynamicImage, quality: u8) -> Result<Vec<u8>, ImageError>;
}

/// JPEG encoder using the image crate
pub struct JpegEncoder;

impl ImageEncoder for JpegEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Jpeg
    }

    fn encode(&self, img: &DynamicImage, quality: u8) -> Result<Vec<u8>, ImageError> {
        use image::codecs::jpeg::JpegEncoder as ImageJpegEncoder;

        // JPEG has no alpha channel
        let rgb = img.to_rgb8();
        let mut output = Cursor::new(Vec::new());
        let encoder = ImageJpegEncoder::new_with_quality(&mut output, quality.clamp(1, 100));

        encoder
            .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)
            .map_err(|e| ImageError::encode_failed("jpeg", e.to_string()))?;

        Ok(output.into_inner())
    }
}

/// PNG encoder using the image crate
pub struct PngEncoder;

impl ImageEncoder for PngEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Png
    }

    fn encode(&self, img: &DynamicImage, _quality: u8) -> Result<Vec<u8>, ImageError> {
        use image::codecs::png::PngEncoder as ImagePngEncoder;

        let rgba = img.to_rgba8();
        let mut output = Cursor::new(Vec::new());
        let encoder = ImagePngEncoder::new(&mut output);

        encoder
            .write_image(rgba.as_raw(), rgba.width(), rgba.height(), ColorType::Rgba8)
            .map_err(|e| ImageError::encode_failed("png", e.to_string()))?;

        Ok(output.into_inner())
    }
}

/// WebP encoder using the image crate
///
/// The image crate only encodes lossless WebP, so quality is ignored.
pub struct WebPEncoder;

impl ImageEncoder for WebPEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::WebP
    }

    fn encode(&self, img: &DynamicImage, _quality: u8) -> Result<Vec<u8>, ImageError> {
        use image::codecs::webp::WebPEncoder as ImageWebPEncoder;

        let rgba = img.to_rgba8();
        let mut output = Cursor::new(Vec::new());
        let encoder = ImageWebPEncoder::new_lossless(&mut output);

        encoder
            .write_image(rgba.as_raw(), rgba.width(), rgba.height(), ColorType::Rgba8)
            .map_err(|e| ImageError::encode_failed("webp", e.to_string()))?;

        Ok(output.into_inner())
    }
}

/// Pick the encoder for an output format
pub fn encoder_for(format: OutputFormat) -> Box<dyn ImageEncoder> {
    match format {
        OutputFormat::Jpeg => Box::new(JpegEncoder),
        OutputFormat::Png => Box::new(PngEncoder),
        OutputFormat::WebP => Box::new(WebPEncoder),
    }
}
