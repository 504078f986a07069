//! API Handlers
//!
//! One module per route group. Read handlers go through
//! [`CacheService::get_or_populate`](crate::cache::CacheService::get_or_populate);
//! mutating handlers finish by invalidating the keys they made stale.

pub mod dashboard;
pub mod orders;
pub mod payments;
pub mod products;
pub mod system;
pub mod users;

use crate::error::ApiError;

fn not_found(entity: &str) -> ApiError {
    ApiError::NotFound(format!("{entity} not found"))
}
