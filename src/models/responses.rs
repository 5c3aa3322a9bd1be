//! Response DTOs for the administrative API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStatsSnapshot;

/// Response body for the stats endpoint (GET /cache/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Entries currently held in the memory tier
    pub memory_entries: usize,
    /// Rows currently persisted in the durable tier
    pub durable_entries: u64,
    /// Successful retrievals
    pub hits: u64,
    /// Failed retrievals
    pub misses: u64,
    /// Capacity evictions from the memory tier
    pub evictions: u64,
    /// Tier-2 hits promoted into tier 1
    pub promotions: u64,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl From<CacheStatsSnapshot> for StatsResponse {
    fn from(snapshot: CacheStatsSnapshot) -> Self {
        Self {
            memory_entries: snapshot.memory_entries,
            durable_entries: snapshot.durable_entries,
            hits: snapshot.hits,
            misses: snapshot.misses,
            evictions: snapshot.evictions,
            promotions: snapshot.promotions,
            hit_rate: snapshot.hit_rate,
        }
    }
}

/// Response body for the clear-all endpoint (DELETE /cache)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
}

impl ClearResponse {
    /// Creates a new ClearResponse
    pub fn new() -> Self {
        Self {
            message: "Cache cleared successfully".to_string(),
        }
    }
}

impl Default for ClearResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
