//! Value Codec Module
//!
//! (De)serializes cached payloads to and from the TEXT column of the
//! durable tier. The memory tier stores decoded values directly.

use serde_json::Value;

use crate::error::{CacheError, Result};

/// Encodes a payload for durable storage.
pub fn encode(value: &Value) -> Result<String> {
    serde_json::to_string(value).map_err(CacheError::Serialization)
}

/// Decodes a payload previously written by [`encode`].
pub fn decode(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).map_err(CacheError::Serialization)
}
