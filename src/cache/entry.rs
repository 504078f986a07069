//! Cache Entry Module
//!
//! A serialized response blob plus its optional expiry.

use chrono::Utc;

// == Cache Entry ==
/// Represents a single cached response.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Serialized payload, opaque to the store
    pub value: String,
    /// Write timestamp (Unix milliseconds)
    pub stored_at: i64,
    /// Expiration timestamp (Unix milliseconds), None = lives until invalidated
    pub expires_at: Option<i64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry, expiring after `ttl_seconds` when given.
    pub fn new(value: String, ttl_seconds: Option<u64>) -> Self {
        let now = current_timestamp_ms();
        let expires_at = ttl_seconds.map(|ttl| now.saturating_add(ttl as i64 * 1000));

        Self {
            value,
            stored_at: now,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches its expiration time.
    /// Entries without a TTL never expire.
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires| current_timestamp_ms() >= expires)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}
