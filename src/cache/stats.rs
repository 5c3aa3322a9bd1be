//! Cache Statistics Module
//!
//! Tracks cache performance counters. Counters are atomics so a stats
//! snapshot never takes the memory tier lock or mutates cache state.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Engine Counters ==
/// Monotonic performance counters maintained by the engine.
#[derive(Debug, Default)]
pub struct EngineCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    promotions: AtomicU64,
}

impl EngineCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful retrieval from either tier.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a failed retrieval (absent or expired in both tiers).
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Records entries evicted from the memory tier by the capacity rule.
    pub fn record_evictions(&self, count: u64) {
        if count > 0 {
            self.evictions.fetch_add(count, Ordering::Relaxed);
        }
    }

    /// Records a tier-2 hit copied back into tier 1.
    pub fn record_promotion(&self) {
        self.promotions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    pub fn promotions(&self) -> u64 {
        self.promotions.load(Ordering::Relaxed)
    }
}

// == Stats Snapshot ==
/// Point-in-time view of both tiers, returned by `CacheEngine::stats`.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsSnapshot {
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

impl CacheStatsSnapshot {
    pub fn new(memory_entries: usize, durable_entries: u64, counters: &EngineCounters) -> Self {
        let hits = counters.hits();
        let misses = counters.misses();
        let total = hits + misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        };

        Self {
            memory_entries,
            durable_entries,
            hits,
            misses,
            evictions: counters.evictions(),
            promotions: counters.promotions(),
            hit_rate,
        }
    }
}
