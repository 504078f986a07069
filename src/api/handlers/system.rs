//! Service endpoints: root banner, health and cache counters.

use axum::{extract::State, Json};

use crate::api::{AdminUser, AppState};
use crate::models::{CacheStatsResponse, HealthResponse};

/// GET /
pub async fn root() -> &'static str {
    "Api working with /api/v1"
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// GET /api/v1/cache/stats
pub async fn cache_stats(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Json<CacheStatsResponse> {
    Json(CacheStatsResponse::new(state.cache.stats().await))
}
