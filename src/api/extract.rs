//! Request extractors.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use tracing::debug;

use super::AppState;
use crate::error::ApiError;
use crate::models::{ActorQuery, User};

/// The acting user, resolved from `?id=` and required to be an admin.
///
/// Rejects with 401 when no id is given, 404 when the id is unknown and 403
/// when the user is not an admin.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let actor = Query::<ActorQuery>::from_request_parts(parts, state)
            .await
            .map(|Query(actor)| actor)
            .unwrap_or_default();

        let id = actor
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ApiError::Unauthorized("Login required".to_string()))?;

        let user = state
            .db
            .find_user(&id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        if !user.is_admin() {
            debug!(user_id = %user.id, "admin route refused");
            return Err(ApiError::Forbidden("Admin access denied".to_string()));
        }
        Ok(Self(user))
    }
}
