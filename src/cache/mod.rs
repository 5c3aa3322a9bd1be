//! Cache Module
//!
//! Two-tier caching: a fast in-process memory tier backed by a durable
//! SQLite tier, with TTL expiration, insertion-ordered capacity eviction
//! and substring pattern purges.

pub mod codec;
mod durable;
mod engine;
mod entry;
pub mod keys;
mod memory;
mod stats;


// Re-export public types
pub use durable::{DurableStore, StoredEntry};
pub use engine::{CacheEngine, SweepReport};
pub use entry::{current_timestamp_ms, CacheEntry};
pub use memory::MemoryStore;
pub use stats::{CacheStatsSnapshot, EngineCounters};

// == Public Constants ==
/// Maximum key length the request adapter will cache under
pub const MAX_KEY_LENGTH: usize = 512;

/// Maximum response payload size the request adapter will cache
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
