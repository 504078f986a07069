//! Cache Store Module
//!
//! Process-local key to serialized-blob mapping. There is no size bound and
//! no eviction: entries leave only through explicit deletion or, when a
//! default TTL is configured, expiry.

use std::collections::HashMap;

use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
#[derive(Debug, Default)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
    /// TTL in seconds applied to every write, None = no expiry
    default_ttl: Option<u64>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `default_ttl` - TTL in seconds applied to every write, `None` keeps
    ///   entries until they are deleted
    pub fn new(default_ttl: Option<u64>) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            default_ttl,
        }
    }

    // == Set ==
    /// Stores a value, overwriting any previous value under the same key.
    pub fn set(&mut self, key: impl Into<String>, value: String) {
        let entry = CacheEntry::new(value, self.default_ttl);
        self.entries.insert(key.into(), entry);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Expired entries are dropped and reported as misses.
    pub fn get(&mut self, key: &str) -> Option<String> {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                let value = entry.value.clone();
                self.stats.record_hit();
                Some(value)
            }
            Some(_) => {
                self.entries.remove(key);
                self.stats.set_total_entries(self.entries.len());
                self.stats.record_miss();
                None
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Has ==
    /// Returns true if a live entry exists. Does not touch the hit/miss counters.
    pub fn has(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    // == Delete ==
    /// Removes every listed key. Absent keys are ignored.
    ///
    /// Returns the number of entries actually removed.
    pub fn del<I, K>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let removed = keys
            .into_iter()
            .filter(|key| self.entries.remove(key.as_ref()).is_some())
            .count();

        self.stats.record_deletions(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        self.stats.set_total_entries(self.entries.len());
        before - self.entries.len()
    }

    /// Lists live keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
