//! Transform error types
//!
//! Two families live here: [`SpecError`] for the imageView2 parser, which the
//! proxy reports as a client error, and [`ImageError`] for the transform
//! capability, which the proxy reports as an upstream failure.

use std::fmt;

use thiserror::Error;

/// Hard failures of the spec parser
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    /// Nothing left to parse after extraction and prefix stripping
    #[error("empty spec string")]
    Empty,
}

/// Errors that can occur while transforming an image
#[derive(Debug, Clone)]
pub enum ImageError {
    /// Requested output format has no encoder
    UnsupportedFormat { format: String },
    /// Failed to decode image data
    DecodeFailed { message: String },
    /// Resize operation failed
    ResizeFailed { message: String },
    /// Encoding to output format failed
    EncodeFailed { format: String, message: String },
    /// Requested dimensions cannot be produced
    InvalidDimensions {
        width: i64,
        height: i64,
        reason: String,
    },
    /// Decoded source would exceed dimension or pixel limits
    ImageBombDetected {
        width: u32,
        height: u32,
        pixels: u64,
        max_pixels: u64,
    },
    /// Input exceeds the configured size limit
    FileTooLarge { size: usize, max_size: usize },
    /// Blocking worker died before producing a result
    WorkerFailed { message: String },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::UnsupportedFormat { format } => {
                write!(f, "Unsupported output format: {}", format)
            }
            ImageError::DecodeFailed { message } => {
                write!(f, "Failed to decode image: {}", message)
            }
            ImageError::ResizeFailed { message } => {
                write!(f, "Resize failed: {}", message)
            }
            ImageError::EncodeFailed { format, message } => {
                write!(f, "Failed to encode to {}: {}", format, message)
            }
            ImageError::InvalidDimensions {
                width,
                height,
                reason,
            } => {
                write!(f, "Invalid dimensions {}x{}: {}", width, height, reason)
            }
            ImageError::ImageBombDetected {
                width,
                height,
                pixels,
                max_pixels,
            } => {
                write!(
                    f,
                    "Image dimensions {}x{} ({} pixels) exceed limit of {} pixels",
                    width, height, pixels, max_pixels
                )
            }
            ImageError::FileTooLarge { size, max_size } => {
                write!(
                    f,
                    "File size {} bytes exceeds maximum {} bytes",
                    size, max_size
                )
            }
            ImageError::WorkerFailed { message } => {
                write!(f, "Transform worker failed: {}", message)
            }
        }
    }
}

impl std::error::Error for ImageError {}

impl ImageError {
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        ImageError::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn decode_failed(message: impl Into<String>) -> Self {
        ImageError::DecodeFailed {
            message: message.into(),
        }
    }

    pub fn resize_failed(message: impl Into<String>) -> Self {
        ImageError::ResizeFailed {
            message: message.into(),
        }
    }

    pub fn encode_failed(format: impl Into<String>, message: impl Into<String>) -> Self {
        ImageError::EncodeFailed {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn invalid_dimensions(width: i64, height: i64, reason: impl Into<String>) -> Self {
        ImageError::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }
}
