//! Tandem Cache - a two-tier read-through cache
//!
//! A fast in-process memory tier backed by a durable SQLite tier, with TTL
//! expiration, capacity eviction, pattern-based invalidation and axum
//! middleware that wires reads and writes into the cache.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod invalidation;
pub mod middleware;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheEngine, DurableStore};
pub use config::Config;
pub use error::CacheError;
pub use invalidation::InvalidationRouter;
pub use middleware::CachePolicy;
pub use tasks::spawn_sweep_task;
