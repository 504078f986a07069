//! Shop API - storefront and admin backend
//!
//! Users, products, orders, payments and coupons over a pluggable document
//! store, with an in-memory response cache and cached dashboard analytics.

pub mod analytics;
pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod payment;
pub mod tasks;
pub mod uploads;

pub use api::{create_router, AppState};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
