//! Admin dashboard handlers.
//!
//! Each payload is cached whole under a fixed key and rebuilt on the first
//! request after an admin invalidation.

use axum::{extract::State, Json};
use chrono::Utc;

use crate::analytics;
use crate::api::{AdminUser, AppState};
use crate::cache::keys;
use crate::error::{ApiError, Result};
use crate::models::{BarChartsResponse, LineChartsResponse, PieChartsResponse, StatsResponse};

/// GET /dashboard/stats
pub async fn stats(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>> {
    let stats = state
        .cache
        .get_or_populate(keys::STATS, || async {
            analytics::dashboard_stats(state.db.as_ref(), Utc::now())
                .await
                .map_err(ApiError::from)
        })
        .await?;
    Ok(Json(StatsResponse::new(stats)))
}

/// GET /dashboard/pie
pub async fn pie(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<PieChartsResponse>> {
    let charts = state
        .cache
        .get_or_populate(keys::PIE_CHARTS, || async {
            analytics::pie_charts(state.db.as_ref(), Utc::now())
                .await
                .map_err(ApiError::from)
        })
        .await?;
    Ok(Json(PieChartsResponse::new(charts)))
}

/// GET /dashboard/bar
pub async fn bar(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<BarChartsResponse>> {
    let charts = state
        .cache
        .get_or_populate(keys::BAR_CHARTS, || async {
            analytics::bar_charts(state.db.as_ref(), Utc::now())
                .await
                .map_err(ApiError::from)
        })
        .await?;
    Ok(Json(BarChartsResponse::new(charts)))
}

/// GET /dashboard/line
pub async fn line(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<LineChartsResponse>> {
    let charts = state
        .cache
        .get_or_populate(keys::LINE_CHARTS, || async {
            analytics::line_charts(state.db.as_ref(), Utc::now())
                .await
                .map_err(ApiError::from)
        })
        .await?;
    Ok(Json(LineChartsResponse::new(charts)))
}
