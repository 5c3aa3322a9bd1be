//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

// == Cache Entry ==
/// Represents a single cache entry with an opaque JSON payload and metadata.
///
/// The payload is never interpreted by the cache; callers own its shape.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: Value,
    /// Insertion timestamp (Unix milliseconds), immutable after creation
    pub timestamp: u64,
    /// Time to live in milliseconds
    pub ttl_ms: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current time.
    pub fn new(value: Value, ttl_ms: u64) -> Self {
        Self {
            value,
            timestamp: current_timestamp_ms(),
            ttl_ms,
        }
    }

    /// Rebuilds an entry from durable tier columns.
    pub fn from_parts(value: Value, timestamp: u64, ttl_ms: u64) -> Self {
        Self {
            value,
            timestamp,
            ttl_ms,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is dead once `now > timestamp + ttl`, strictly greater: at the
    /// exact expiry instant the entry is still served.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    /// Expiry check against an externally supplied clock reading, so a sweep
    /// pass can evaluate every entry against one consistent instant.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms > self.timestamp + self.ttl_ms
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, zero once expired.
    pub fn ttl_remaining_ms(&self) -> u64 {
        let deadline = self.timestamp + self.ttl_ms;
        deadline.saturating_sub(current_timestamp_ms())
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
