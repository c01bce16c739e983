//! Mapping from a parsed spec to transform options

use std::fmt;

use crate::constants::DEFAULT_CONTENT_TYPE;

use super::params::{ModeValue, ParsedSpec};

/// How to fit the image within target dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitMode {
    /// Fill target dimensions, cropping as needed
    Cover,
    /// Fit within target dimensions, no cropping
    #[default]
    Contain,
}

impl FitMode {
    /// Fit strategy for an imageView2 mode.
    ///
    /// Modes 1, 3 and 5 crop; everything else, including an absent or
    /// non-numeric mode, contains.
    pub fn for_mode(mode: Option<ModeValue>) -> Self {
        match mode {
            Some(ModeValue::Numeric(1 | 3 | 5)) => FitMode::Cover,
            Some(ModeValue::Numeric(_)) => FitMode::Contain,
            Some(ModeValue::NotANumber) => FitMode::Contain,
            None => FitMode::Contain,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FitMode::Cover => "cover",
            FitMode::Contain => "contain",
        }
    }
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options handed to the transform capability
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformOptions {
    pub fit: FitMode,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub quality: Option<i64>,
    pub format: Option<String>,
}

impl TransformOptions {
    /// Derive options from a parsed spec.
    ///
    /// Numeric fields are copied only when non-zero and `format` only when
    /// non-empty: an explicit `w/0` behaves as if width was never given.
    pub fn from_spec(spec: &ParsedSpec) -> Self {
        Self {
            fit: FitMode::for_mode(spec.mode),
            width: spec.width.filter(|w| *w != 0),
            height: spec.height.filter(|h| *h != 0),
            quality: spec.quality.filter(|q| *q != 0),
            format: spec.format.clone().filter(|f| !f.is_empty()),
        }
    }

    /// Content-Type of the transformed response
    pub fn content_type(&self) -> String {
        match &self.format {
            Some(format) => format!("image/{}", format),
            None => DEFAULT_CONTENT_TYPE.to_string(),
        }
    }
}

impl From<&ParsedSpec> for TransformOptions {
    fn from(spec: &ParsedSpec) -> Self {
        Self::from_spec(spec)
    }
}
