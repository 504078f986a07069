//! Cache Service
//!
//! Shared handle over the [`CacheStore`] used by every handler. It owns JSON
//! (de)serialization of cached payloads and collapses concurrent misses on
//! the same key into a single population.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex as SyncMutex, PoisonError};

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::cache::{invalidation, CacheStats, CacheStore, InvalidationRequest};
use crate::error::{ApiError, Result};

type FlightGate = Arc<Mutex<()>>;
type FlightMap = Arc<SyncMutex<HashMap<String, FlightGate>>>;

// == Cache Service ==
/// Cloneable handle to the process-wide response cache.
#[derive(Clone, Default)]
pub struct CacheService {
    store: Arc<RwLock<CacheStore>>,
    in_flight: FlightMap,
}

impl CacheService {
    pub fn new(store: CacheStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            in_flight: Arc::new(SyncMutex::new(HashMap::new())),
        }
    }

    /// Underlying store, shared with the TTL cleanup task.
    pub fn store(&self) -> Arc<RwLock<CacheStore>> {
        self.store.clone()
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.store.write().await.get(key)
    }

    pub async fn has(&self, key: &str) -> bool {
        self.store.read().await.has(key)
    }

    pub async fn set(&self, key: &str, value: String) {
        self.store.write().await.set(key, value);
    }

    pub async fn del<I, K>(&self, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        self.store.write().await.del(keys)
    }

    // == Typed Access ==
    /// Reads and decodes a cached payload.
    ///
    /// A blob that no longer decodes into `T` is dropped and reported as a miss.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key).await?;

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, error = %err, "discarding undecodable cache entry");
                self.del([key]).await;
                None
            }
        }
    }

    /// Encodes and stores a payload.
    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)
            .map_err(|err| ApiError::Internal(format!("failed to encode cache entry: {err}")))?;
        self.set(key, raw).await;
        Ok(())
    }

    // == Get Or Populate ==
    /// Returns the cached payload under `key`, or runs `populate`, caches its
    /// result and returns it.
    ///
    /// Concurrent callers missing on the same key wait for the first one and
    /// then read its result, so `populate` runs once per miss. Errors from
    /// `populate` are returned as-is and nothing is cached.
    pub async fn get_or_populate<T, F, Fut>(&self, key: &str, populate: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(cached) = self.get_json(key).await {
            debug!(key, "cache hit");
            return Ok(cached);
        }

        let flight = FlightGuard::join(&self.in_flight, key);
        let _permit = flight.gate().lock().await;

        // Another caller may have populated the key while we waited.
        if let Some(cached) = self.get_json(key).await {
            debug!(key, "cache filled by concurrent request");
            return Ok(cached);
        }

        debug!(key, "cache miss, populating");
        match populate().await {
            Ok(value) => self.set_json(key, &value).await.map(|_| value),
            Err(err) => Err(err),
        }
    }

    // == Invalidate ==
    /// Drops every key the request marks stale.
    pub async fn invalidate(&self, request: &InvalidationRequest) {
        if request.is_empty() {
            return;
        }

        let removed = {
            let mut store = self.store.write().await;
            invalidation::invalidate(&mut store, request)
        };

        info!(
            product = request.product,
            order = request.order,
            admin = request.admin,
            removed,
            "cache invalidated"
        );
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }
}

// == Flight Guard ==
/// One caller's hold on the gate for a key.
///
/// The map entry is removed when the last holder of that gate goes away,
/// whether it finished or was dropped mid-await. Every clone and drop of a
/// gate happens under the map lock, so the strong count is exact there.
struct FlightGuard<'a> {
    in_flight: &'a SyncMutex<HashMap<String, FlightGate>>,
    key: &'a str,
    gate: FlightGate,
}

impl<'a> FlightGuard<'a> {
    fn join(in_flight: &'a SyncMutex<HashMap<String, FlightGate>>, key: &'a str) -> Self {
        let gate = in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.to_string())
            .or_default()
            .clone();

        Self {
            in_flight,
            key,
            gate,
        }
    }

    fn gate(&self) -> &Mutex<()> {
        &self.gate
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        let gate = std::mem::take(&mut self.gate);
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);

        // Only the map and this guard left: nobody else is waiting on it.
        let last_holder = in_flight
            .get(self.key)
            .is_some_and(|current| Arc::ptr_eq(current, &gate) && Arc::strong_count(&gate) == 2);
        if last_holder {
            in_flight.remove(self.key);
        }
        drop(gate);
    }
}
