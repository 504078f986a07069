//! TTL Cleanup Task
//!
//! Background task that periodically sweeps expired response cache entries.
//! Only spawned when a default cache TTL is configured.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a task that calls [`CacheStore::cleanup_expired`] every
/// `interval_secs` seconds.
///
/// The returned handle is aborted on graceful shutdown.
pub fn spawn_cleanup_task(store: Arc<RwLock<CacheStore>>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(interval_secs, "cache cleanup task started");

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.write().await.cleanup_expired();
            if removed > 0 {
                info!(removed, "expired cache entries swept");
            } else {
                debug!("cache sweep found nothing expired");
            }
        }
    })
}
