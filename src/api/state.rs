//! Shared application state.

use std::sync::Arc;

use crate::cache::{CacheService, CacheStore};
use crate::config::Config;
use crate::db::{DocumentStore, MemoryStore};
use crate::payment::{PaymentGateway, RazorpayGateway};
use crate::uploads::UploadStore;

/// Everything a handler needs, cloned into each request.
#[derive(Clone)]
pub struct AppState {
    /// Response cache, shared with the TTL cleanup task
    pub cache: CacheService,
    pub db: Arc<dyn DocumentStore>,
    pub payments: Arc<dyn PaymentGateway>,
    pub uploads: UploadStore,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the given collaborators to a fresh cache.
    pub fn new(
        config: Config,
        db: Arc<dyn DocumentStore>,
        payments: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            cache: CacheService::new(CacheStore::new(config.cache_ttl())),
            db,
            payments,
            uploads: UploadStore::new(&config.upload_dir),
            config: Arc::new(config),
        }
    }

    /// In-memory document store and the Razorpay gateway, both configured
    /// from `config`.
    pub fn from_config(config: Config) -> Self {
        let payments = RazorpayGateway::new(
            config.razorpay_key_id.clone(),
            config.razorpay_key_secret.clone(),
        );
        Self::new(config, Arc::new(MemoryStore::new()), Arc::new(payments))
    }
}
