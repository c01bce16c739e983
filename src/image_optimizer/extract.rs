//! imageView2 spec extraction
//!
//! Clients put the spec into the query string in one of two shapes:
//!
//! ```text
//! /photo.jpg?imageView2=2/w/20/h/20     key + value
//! /photo.jpg?imageView2/2/w/20/h/20     whole spec in the key, no value
//! ```
//!
//! Both collapse to the same spec string (`2/w/20/h/20`).

use crate::constants::{SPEC_KEY_PREFIX, SPEC_STRIP_PREFIX};

/// Find the imageView2 spec among decoded query pairs.
///
/// Pairs must be in request order; only the first key starting with
/// `imageView2` is honored. Returns `None` when no such key exists, which
/// means the request is a plain passthrough fetch.
///
/// Only a leading `imageView2/` is stripped: a bare `imageView2` key stays
/// as the spec string `imageView2`, and `imageView2/` alone yields an empty
/// string, which the parser rejects.
pub fn extract_spec<K, V>(pairs: &[(K, V)]) -> Option<String>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let (key, value) = pairs
        .iter()
        .map(|(k, v)| (k.as_ref(), v.as_ref()))
        .find(|(k, _)| k.starts_with(SPEC_KEY_PREFIX))?;

    let raw = if value.is_empty() {
        key.to_string()
    } else {
        format!("{}/{}", key, value)
    };

    Some(strip_prefix(&raw).to_string())
}

fn strip_prefix(raw: &str) -> &str {
    raw.strip_prefix(SPEC_STRIP_PREFIX).unwrap_or(raw)
}
