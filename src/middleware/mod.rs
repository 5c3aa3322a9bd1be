//! Request Cache Adapter
//!
//! The boundary between the request-handling layer and the cache engine:
//! a read-through middleware for idempotent reads, a post-success
//! invalidation middleware for mutations, the deterministic request-key
//! builder and per-route cache policies.

mod invalidate;
mod key;
mod policy;
mod read_cache;

pub use invalidate::{invalidate_after, InvalidateState};
pub use key::request_key;
pub use policy::{CachePolicy, Condition};
pub use read_cache::{read_cache, ReadCacheState, CACHE_STATUS_HEADER};
