//! imageView2 spec parsing
//!
//! A spec string is a `/`-delimited token list: the first token is the mode,
//! the rest are `key/value` pairs.
//!
//! ```text
//! 2/w/100/h/200/format/jpg/q/90
//! ```
//!
//! Parsing is lenient. Unknown keys are skipped together with their value,
//! a trailing key without a value is dropped, and unparsable numbers leave
//! the field unset. The only hard failure is an empty spec string.

use std::fmt;

use crate::constants::SPEC_DELIMITER;

use super::error::SpecError;

/// Mode token of a spec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeValue {
    Numeric(i64),
    /// First token had no leading digits
    NotANumber,
}

impl fmt::Display for ModeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeValue::Numeric(n) => write!(f, "{}", n),
            ModeValue::NotANumber => write!(f, "NaN"),
        }
    }
}

/// Parsed imageView2 spec
///
/// Every field is independently optional. No cross-field rule is enforced
/// here; the option mapper decides what the combination means.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSpec {
    pub mode: Option<ModeValue>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    /// Copied verbatim from the spec
    pub format: Option<String>,
    pub interlace: Option<i64>,
    pub quality: Option<i64>,
}

impl ParsedSpec {
    /// Parse a spec string (already stripped of its `imageView2/` prefix)
    pub fn parse(spec: &str) -> Result<Self, SpecError> {
        if spec.is_empty() {
            return Err(SpecError::Empty);
        }

        let mut tokens = spec.split(SPEC_DELIMITER);
        let mut result = Self::default();

        if let Some(first) = tokens.next() {
            result.mode = Some(match parse_int(first) {
                Some(n) => ModeValue::Numeric(n),
                None => ModeValue::NotANumber,
            });
        }

        while let Some(key) = tokens.next() {
            // dangling key at the end is discarded
            let Some(value) = tokens.next() else {
                break;
            };

            match key {
                "w" => result.width = parse_int(value),
                "h" => result.height = parse_int(value),
                "format" => result.format = Some(value.to_string()),
                "interlace" => result.interlace = parse_int(value),
                "q" => result.quality = parse_int(value),
                _ => {}
            }
        }

        Ok(result)
    }
}

/// Read a leading integer the way lenient URL-parameter parsers do.
///
/// Leading whitespace is skipped, one sign is accepted, then the longest run
/// of ASCII digits is taken; the rest of the token is ignored. Returns `None`
/// when no digit follows. Out-of-range values saturate.
pub(crate) fn parse_int(token: &str) -> Option<i64> {
    let trimmed = token.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude = digits[..end].bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });

    Some(if negative {
        magnitude.saturating_neg()
    } else {
        magnitude
    })
}
