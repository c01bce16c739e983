//! imageView2 transform support
//!
//! The request pipeline runs three pure steps before any I/O happens:
//!
//! 1. [`extract_spec`] finds the spec string in the query pairs
//! 2. [`ParsedSpec::parse`] turns it into optional fields
//! 3. [`TransformOptions::from_spec`] maps those fields to transform options
//!
//! ```text
//! /photos/cat.jpg?imageView2/1/w/200/h/200/format/webp/q/75
//!   → "1/w/200/h/200/format/webp/q/75"
//!   → { mode: 1, width: 200, height: 200, format: "webp", quality: 75 }
//!   → { fit: cover, width: 200, height: 200, quality: 75, format: "webp" }
//! ```
//!
//! The options are then handed to a [`Transformer`]. [`ImageTransformer`] is
//! the built-in one.

pub mod encoder;
pub mod error;
pub mod extract;
pub mod options;
pub mod params;
pub mod processor;

// Re-export commonly used types
pub use encoder::{encoder_for, ImageEncoder, OutputFormat};
pub use error::{ImageError, SpecError};
pub use extract::extract_spec;
pub use options::{FitMode, TransformOptions};
pub use params::{ModeValue, ParsedSpec};
pub use processor::{process_image, ImageTransformer, Transformer};
