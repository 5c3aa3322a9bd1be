//! Request Key Module
//!
//! Builds the deterministic cache key for an inbound read request. Two
//! requests with the same semantic inputs must map to the same key, so the
//! query string is canonicalized into a sorted multimap before encoding;
//! path parameters are covered by the concrete request path.

use std::collections::BTreeMap;

use axum::http::Request;

/// Computes the cache key for a request:
/// `api:{METHOD}:{path}:{canonical-query-json}`.
pub fn request_key<B>(req: &Request<B>) -> String {
    let method = req.method().as_str();
    let path = req.uri().path();
    let query = canonical_query(req.uri().query().unwrap_or(""));
    format!("api:{method}:{path}:{query}")
}

/// Parses a raw query string into a key-sorted multimap and encodes it as
/// JSON. Repeated parameters are value-sorted so their order never changes
/// the key either.
fn canonical_query(raw: &str) -> String {
    let mut params: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for pair in raw.split('&').filter(|p| !p.is_empty()) {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        params.entry(name).or_default().push(value);
    }
    for values in params.values_mut() {
        values.sort_unstable();
    }
    serde_json::to_string(&params).unwrap_or_default()
}
