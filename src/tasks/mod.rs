//! Background Tasks Module
//!
//! # Tasks
//! - TTL Cleanup: sweeps expired cache entries when a cache TTL is set

mod cleanup;

pub use cleanup::spawn_cleanup_task;
