//! Cache Module
//!
//! In-memory response cache: a key to serialized-payload store, the
//! invalidation rules that keep it honest, and the shared service handlers use.

mod entry;
pub mod invalidation;
pub mod keys;
mod service;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use invalidation::InvalidationRequest;
pub use service::CacheService;
pub use stats::CacheStats;
pub use store::CacheStore;
