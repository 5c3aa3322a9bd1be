//! Memory Store Module
//!
//! The fast, volatile tier: a bounded map of cache entries with
//! insertion-ordered eviction. Reads never reorder entries; a replaced key
//! moves to the back of the queue because its insertion time resets.

use std::collections::{HashMap, VecDeque};

use crate::cache::CacheEntry;

// == Memory Store ==
/// In-process tier-1 store.
///
/// Invariant: `len() <= max_entries` after every mutating operation,
/// enforced by evicting the oldest-inserted entries rather than by
/// rejecting inserts.
#[derive(Debug)]
pub struct MemoryStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Keys by insertion order, front = oldest
    order: VecDeque<String>,
    /// Maximum number of entries allowed
    max_entries: usize,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store with the given capacity.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            max_entries,
        }
    }

    // == Insert ==
    /// Stores an entry, fully replacing any previous entry under the key,
    /// then restores the capacity bound.
    ///
    /// Returns the keys evicted to stay within capacity.
    pub fn insert(&mut self, key: String, entry: CacheEntry) -> Vec<String> {
        if self.entries.insert(key.clone(), entry).is_some() {
            // Replacement resets insertion order
            self.order.retain(|k| k != &key);
        }
        self.order.push_back(key);

        self.evict_over_capacity()
    }

    // == Get ==
    /// Returns a clone of the entry for the key, expired or not.
    ///
    /// Expiry is the engine's concern: the engine decides whether a dead
    /// entry becomes an eviction in both tiers.
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.get(key).cloned()
    }

    // == Remove ==
    /// Removes an entry; returns false if the key was absent.
    pub fn remove(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.order.retain(|k| k != key);
            true
        } else {
            false
        }
    }

    // == Remove Matching ==
    /// Removes every entry whose key contains `pattern` as a substring.
    ///
    /// Returns the number of entries removed.
    pub fn remove_matching(&mut self, pattern: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.contains(pattern));
        self.order.retain(|key| !key.contains(pattern));
        before - self.entries.len()
    }

    // == Clear ==
    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    // == Sweep Expired ==
    /// Removes all entries dead at `now_ms`.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired(&mut self, now_ms: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now_ms));
        let entries = &self.entries;
        self.order.retain(|key| entries.contains_key(key));
        before - self.entries.len()
    }

    // == Evict Over Capacity ==
    /// Evicts oldest-inserted entries until `len() <= max_entries`.
    ///
    /// Returns the evicted keys, oldest first.
    pub fn evict_over_capacity(&mut self) -> Vec<String> {
        let mut evicted = Vec::new();
        while self.entries.len() > self.max_entries {
            match self.order.pop_front() {
                Some(key) => {
                    self.entries.remove(&key);
                    evicted.push(key);
                }
                None => break,
            }
        }
        evicted
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
