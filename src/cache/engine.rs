//! Cache Engine Module
//!
//! Orchestrates get/set/delete/clear across the memory and durable tiers,
//! owns TTL policy, capacity eviction and the sweep entry point.
//!
//! The engine is an explicit value constructed once at process start and
//! handed to every component that needs it; there is no ambient global
//! instance. The memory tier lock is held only for the in-memory mutation,
//! never across durable I/O, and entries are fully built before they are
//! installed so a caller cancelling mid-operation leaves no partial write.

use std::time::Duration;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::durable::StoredEntry;
use crate::cache::entry::current_timestamp_ms;
use crate::cache::{codec, CacheEntry, CacheStatsSnapshot, DurableStore, EngineCounters, MemoryStore};
use crate::config::Config;
use crate::error::Result;

// == Sweep Report ==
/// Outcome of one background sweep pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct SweepReport {
    /// Expired entries removed from the memory tier
    pub memory_expired: usize,
    /// Entries evicted from the memory tier by the capacity rule
    pub memory_evicted: usize,
    /// Expired rows removed from the durable tier
    pub durable_expired: u64,
}

// == Cache Engine ==
/// Two-tier cache engine. All methods are safe under concurrent invocation
/// from independent requests sharing one instance.
#[derive(Debug)]
pub struct CacheEngine {
    /// Tier 1, guarded; guard never held across durable I/O
    memory: RwLock<MemoryStore>,
    /// Tier 2, survives restarts
    durable: DurableStore,
    /// Performance counters, atomically updated
    counters: EngineCounters,
    /// TTL applied when a caller omits one
    default_ttl_ms: u64,
}

impl CacheEngine {
    // == Constructor ==
    /// Creates an engine over an empty memory tier and the given durable store.
    pub fn new(durable: DurableStore, max_memory_entries: usize, default_ttl_ms: u64) -> Self {
        Self {
            memory: RwLock::new(MemoryStore::new(max_memory_entries)),
            durable,
            counters: EngineCounters::new(),
            default_ttl_ms,
        }
    }

    /// Creates an engine with capacity and default TTL taken from configuration.
    pub fn from_config(config: &Config, durable: DurableStore) -> Self {
        Self::new(durable, config.max_memory_entries, config.default_ttl_ms)
    }

    /// TTL in milliseconds applied when a caller omits one.
    pub fn default_ttl_ms(&self) -> u64 {
        self.default_ttl_ms
    }

    // == Get ==
    /// Looks a key up, memory tier first.
    ///
    /// A live tier-1 entry is returned directly. A dead tier-1 entry is
    /// evicted from both tiers and treated as a miss. On tier-1 absence the
    /// durable tier is consulted; a live row is promoted into tier 1 and
    /// returned. Durable read failures are logged and treated as a miss,
    /// never surfaced to the caller.
    pub async fn get(&self, key: &str) -> Option<Value> {
        let cached = {
            let memory = self.memory.read().await;
            memory.get(key)
        };

        if let Some(entry) = cached {
            if !entry.is_expired() {
                self.counters.record_hit();
                return Some(entry.value);
            }

            {
                let mut memory = self.memory.write().await;
                memory.remove(key);
            }
            if let Err(err) = self.durable.remove(key).await {
                warn!(key, error = %err, "failed to drop expired entry from durable tier");
            }
            self.counters.record_miss();
            return None;
        }

        match self.durable.fetch(key).await {
            Ok(Some(row)) => self.promote(key, row).await,
            Ok(None) => {
                self.counters.record_miss();
                None
            }
            Err(err) => {
                warn!(key, error = %err, "durable tier read failed; treating as miss");
                self.counters.record_miss();
                None
            }
        }
    }

    /// Copies a tier-2 row back into tier 1 if it is still alive.
    async fn promote(&self, key: &str, row: StoredEntry) -> Option<Value> {
        let value = match codec::decode(&row.value) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "corrupt durable entry; dropping");
                if let Err(err) = self.durable.remove(key).await {
                    warn!(key, error = %err, "failed to drop corrupt durable entry");
                }
                self.counters.record_miss();
                return None;
            }
        };

        let entry = CacheEntry::from_parts(value, row.timestamp as u64, row.ttl as u64);
        if entry.is_expired() {
            if let Err(err) = self.durable.remove(key).await {
                warn!(key, error = %err, "failed to drop expired entry from durable tier");
            }
            self.counters.record_miss();
            return None;
        }

        let value = entry.value.clone();
        let evicted = {
            let mut memory = self.memory.write().await;
            memory.insert(key.to_string(), entry)
        };
        self.counters.record_evictions(evicted.len() as u64);
        self.counters.record_promotion();
        self.counters.record_hit();
        Some(value)
    }

    // == Set ==
    /// Writes an entry to both tiers with `timestamp = now`, fully replacing
    /// any previous entry under the key, then restores the memory tier
    /// capacity bound.
    ///
    /// A durable write failure or an unencodable value degrades the entry to
    /// memory-only with a logged warning; the call still succeeds.
    pub async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) {
        let ttl_ms = ttl
            .map(|d| d.as_millis() as u64)
            .unwrap_or(self.default_ttl_ms);
        let entry = CacheEntry::new(value, ttl_ms);
        let timestamp = entry.timestamp;
        let encoded = codec::encode(&entry.value);

        let evicted = {
            let mut memory = self.memory.write().await;
            memory.insert(key.to_string(), entry)
        };
        self.counters.record_evictions(evicted.len() as u64);

        match encoded {
            Ok(raw) => {
                if let Err(err) = self.durable.upsert(key, &raw, timestamp, ttl_ms).await {
                    warn!(key, error = %err, "durable tier write failed; entry is memory-only");
                }
            }
            Err(err) => {
                warn!(key, error = %err, "value not encodable; entry is memory-only");
            }
        }
    }

    // == Delete ==
    /// Removes a key from both tiers; absent keys are a no-op.
    pub async fn delete(&self, key: &str) {
        {
            let mut memory = self.memory.write().await;
            memory.remove(key);
        }
        if let Err(err) = self.durable.remove(key).await {
            warn!(key, error = %err, "durable tier delete failed");
        }
    }

    // == Delete Pattern ==
    /// Removes every entry in both tiers whose key contains `pattern` as a
    /// substring. Failures on the durable side are logged; the memory purge
    /// always applies, and the next sweep retires any stragglers.
    pub async fn delete_pattern(&self, pattern: &str) {
        let memory_removed = {
            let mut memory = self.memory.write().await;
            memory.remove_matching(pattern)
        };

        match self.durable.remove_matching(pattern).await {
            Ok(durable_removed) => {
                debug!(pattern, memory_removed, durable_removed, "pattern purge");
            }
            Err(err) => {
                warn!(pattern, error = %err, "durable tier pattern purge failed");
            }
        }
    }

    // == Clear ==
    /// Removes all entries from both tiers.
    pub async fn clear(&self) -> Result<()> {
        {
            let mut memory = self.memory.write().await;
            memory.clear();
        }
        self.durable.clear().await
    }

    // == Stats ==
    /// Snapshot of both tiers and the performance counters. Never mutates
    /// cache state.
    pub async fn stats(&self) -> Result<CacheStatsSnapshot> {
        let memory_entries = {
            let memory = self.memory.read().await;
            memory.len()
        };
        let durable_entries = self.durable.count().await?;
        Ok(CacheStatsSnapshot::new(
            memory_entries,
            durable_entries,
            &self.counters,
        ))
    }

    // == Sweep ==
    /// One janitor pass: drop dead entries from both tiers, then re-apply
    /// the capacity rule to the memory tier.
    pub async fn sweep(&self) -> SweepReport {
        let now = current_timestamp_ms();

        let (memory_expired, memory_evicted) = {
            let mut memory = self.memory.write().await;
            let expired = memory.sweep_expired(now);
            let evicted = memory.evict_over_capacity().len();
            (expired, evicted)
        };
        self.counters.record_evictions(memory_evicted as u64);

        let durable_expired = match self.durable.sweep_expired(now).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!(error = %err, "durable tier sweep failed");
                0
            }
        };

        SweepReport {
            memory_expired,
            memory_evicted,
            durable_expired,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tokio::time::sleep;

    fn db_url(dir: &TempDir) -> String {
        format!("sqlite://{}?mode=rwc", dir.path().join("cache.db").display())
    }

    async fn test_engine(max_entries: usize) -> (TempDir, CacheEngine) {
        let dir = TempDir::new().unwrap();
        let durable = DurableStore::connect(&db_url(&dir)).await.unwrap();
        (dir, CacheEngine::new(durable, max_entries, 300_000))
    }

    #[tokio::test]
    async fn test_set_then_get_roundtrip() {
        let (_dir, engine) = test_engine(100).await;
        let value = json!({"id": 1, "name": "algebra"});

        engine.set("classroom:1", value.clone(), None).await;

        assert_eq!(engine.get("classroom:1").await, Some(value));
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let (_dir, engine) = test_engine(100).await;

        assert_eq!(engine.get("nope").await, None);

        let stats = engine.stats().await.unwrap();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 0);
    }

    #[tokio::test]
    async fn test_lazy_ttl_expiry_purges_both_tiers() {
        let (dir, engine) = test_engine(100).await;

        engine
            .set("short", json!("v"), Some(Duration::from_millis(50)))
            .await;
        sleep(Duration::from_millis(80)).await;

        // Dead even though no sweep has run
        assert_eq!(engine.get("short").await, None);

        // The expired read also dropped the durable row
        let probe = DurableStore::connect(&db_url(&dir)).await.unwrap();
        assert!(probe.fetch("short").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_default_ttl_applied_when_omitted() {
        let (dir, engine) = test_engine(100).await;

        engine.set("k", json!(1), None).await;

        let probe = DurableStore::connect(&db_url(&dir)).await.unwrap();
        let row = probe.fetch("k").await.unwrap().unwrap();
        assert_eq!(row.ttl, 300_000);
    }

    #[tokio::test]
    async fn test_delete_removes_both_tiers() {
        let (dir, engine) = test_engine(100).await;

        engine.set("k", json!("v"), None).await;
        engine.delete("k").await;

        assert_eq!(engine.get("k").await, None);
        let probe = DurableStore::connect(&db_url(&dir)).await.unwrap();
        assert!(probe.fetch("k").await.unwrap().is_none());

        // Deleting an absent key is a no-op, not an error
        engine.delete("k").await;
    }

    #[tokio::test]
    async fn test_delete_pattern_scope() {
        let (dir, engine) = test_engine(100).await;

        engine.set("classroom:1", json!("a"), None).await;
        engine.set("classrooms:list", json!("b"), None).await;
        engine.set("user:5", json!("c"), None).await;

        engine.delete_pattern("classroom:").await;

        assert_eq!(engine.get("classroom:1").await, None);
        assert!(engine.get("classrooms:list").await.is_some());
        assert!(engine.get("user:5").await.is_some());

        // Purge reached the durable tier as well
        let probe = DurableStore::connect(&db_url(&dir)).await.unwrap();
        assert!(probe.fetch("classroom:1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_capacity_eviction_keeps_newest_and_durable_serves_evicted() {
        let (_dir, engine) = test_engine(3).await;

        for i in 0..5 {
            engine.set(&format!("k{i}"), json!(i), None).await;
        }

        let stats = engine.stats().await.unwrap();
        assert_eq!(stats.memory_entries, 3);
        assert_eq!(stats.durable_entries, 5);
        assert_eq!(stats.evictions, 2);

        // Evicted keys are still alive in the durable tier and get promoted
        assert_eq!(engine.get("k0").await, Some(json!(0)));
        let stats = engine.stats().await.unwrap();
        assert_eq!(stats.promotions, 1);
    }

    #[tokio::test]
    async fn test_promotion_after_restart() {
        let dir = TempDir::new().unwrap();

        {
            let durable = DurableStore::connect(&db_url(&dir)).await.unwrap();
            let engine = CacheEngine::new(durable, 100, 300_000);
            engine.set("survivor", json!({"x": 1}), None).await;
        }

        // Fresh process: empty memory tier over the same database
        let durable = DurableStore::connect(&db_url(&dir)).await.unwrap();
        let engine = CacheEngine::new(durable, 100, 300_000);

        assert_eq!(engine.get("survivor").await, Some(json!({"x": 1})));

        // Drop the durable row out from under the engine; the promoted copy
        // in the memory tier still serves the next read
        let probe = DurableStore::connect(&db_url(&dir)).await.unwrap();
        probe.remove("survivor").await.unwrap();
        assert_eq!(engine.get("survivor").await, Some(json!({"x": 1})));
    }

    #[tokio::test]
    async fn test_degraded_storage_keeps_memory_semantics() {
        let dir = TempDir::new().unwrap();
        let durable = DurableStore::connect(&db_url(&dir)).await.unwrap();
        durable.close().await;
        let engine = CacheEngine::new(durable, 100, 300_000);

        // No error propagates; the cache runs memory-only
        engine.set("k", json!("v"), None).await;
        assert_eq!(engine.get("k").await, Some(json!("v")));
        engine.delete_pattern("nothing:").await;
        engine.delete("k").await;
        assert_eq!(engine.get("k").await, None);
    }

    #[tokio::test]
    async fn test_clear_empties_both_tiers() {
        let (_dir, engine) = test_engine(100).await;

        engine.set("k1", json!(1), None).await;
        engine.set("k2", json!(2), None).await;

        engine.clear().await.unwrap();

        let stats = engine.stats().await.unwrap();
        assert_eq!(stats.memory_entries, 0);
        assert_eq!(stats.durable_entries, 0);
        assert_eq!(engine.get("k1").await, None);
    }

    #[tokio::test]
    async fn test_sweep_retires_dead_entries_in_both_tiers() {
        let (_dir, engine) = test_engine(100).await;

        engine
            .set("dead", json!("x"), Some(Duration::from_millis(50)))
            .await;
        engine.set("alive", json!("y"), None).await;
        sleep(Duration::from_millis(80)).await;

        let report = engine.sweep().await;

        assert_eq!(report.memory_expired, 1);
        assert_eq!(report.durable_expired, 1);
        let stats = engine.stats().await.unwrap();
        assert_eq!(stats.memory_entries, 1);
        assert_eq!(stats.durable_entries, 1);
    }

    #[tokio::test]
    async fn test_last_set_wins_for_a_key() {
        let (_dir, engine) = test_engine(100).await;

        engine.set("k", json!("first"), None).await;
        engine.set("k", json!("second"), None).await;

        assert_eq!(engine.get("k").await, Some(json!("second")));
        let stats = engine.stats().await.unwrap();
        assert_eq!(stats.durable_entries, 1);
    }

    #[tokio::test]
    async fn test_concurrent_set_get_yields_only_written_values() {
        let (_dir, engine) = test_engine(100).await;
        let engine = Arc::new(engine);

        let mut handles = Vec::new();
        for i in 0..10 {
            let engine = Arc::clone(&engine);
            handles.push(tokio::spawn(async move {
                engine.set(&format!("k{i}"), json!(format!("v{i}")), None).await;
            }));
        }
        for i in 0..10 {
            let engine = Arc::clone(&engine);
            handles.push(tokio::spawn(async move {
                // Readers race the writers; any observed value must be one
                // some writer actually stored for that key
                if let Some(value) = engine.get(&format!("k{i}")).await {
                    assert_eq!(value, json!(format!("v{i}")));
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        for i in 0..10 {
            assert_eq!(engine.get(&format!("k{i}")).await, Some(json!(format!("v{i}"))));
        }
    }
}
