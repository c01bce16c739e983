//! Proxy utility functions.
//!
//! This module contains helper functions for request processing:
//! - Object key derivation from the request path
//! - Ordered query parameter parsing

use std::borrow::Cow;

use pingora_http::RequestHeader;

/// Percent-decode a URL component.
///
/// Invalid UTF-8 sequences are replaced rather than rejected.
fn decode_component(raw: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned()
}

/// Decode a query component, treating `+` as an encoded space.
fn decode_query_component(raw: &str) -> String {
    let raw: Cow<'_, str> = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };
    decode_component(&raw)
}

/// Parse a raw query string into decoded key/value pairs.
///
/// Pairs are split on `&` and then on the first `=`; a segment without `=`
/// becomes a key with an empty value. Request order is preserved and
/// repeated keys are all kept.
pub fn parse_query_pairs(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            (decode_query_component(key), decode_query_component(value))
        })
        .collect()
}

/// Extract ordered query pairs from the request URI.
pub fn extract_query_pairs(req: &RequestHeader) -> Vec<(String, String)> {
    req.uri.query().map(parse_query_pairs).unwrap_or_default()
}

/// Object key for a request path: percent-decoded, leading `/` removed.
pub fn object_key(path: &str) -> String {
    let decoded = decode_component(path);
    match decoded.strip_prefix('/') {
        Some(key) => key.to_string(),
        None => decoded,
    }
}
