//! User handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::info;

use super::not_found;
use crate::api::{AdminUser, AppState};
use crate::cache::InvalidationRequest;
use crate::error::Result;
use crate::models::{MessageResponse, NewUserRequest, UserResponse, UsersResponse};

/// POST /user/new
///
/// Registers a user. Signing in again with a known id greets the existing
/// user instead of failing.
pub async fn new_user(
    State(state): State<AppState>,
    Json(req): Json<NewUserRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    if let Some(id) = req.id.as_deref() {
        if let Some(existing) = state.db.find_user(id).await? {
            let message = format!("Welcome, {}", existing.name);
            return Ok((StatusCode::OK, Json(MessageResponse::new(message))));
        }
    }

    let user = req.into_user(Utc::now())?;
    let message = format!("Welcome, {}", user.name);
    info!(user_id = %user.id, role = ?user.role, "user created");
    state.db.insert_user(user).await?;

    state
        .cache
        .invalidate(&InvalidationRequest::new().admin())
        .await;

    Ok((StatusCode::CREATED, Json(MessageResponse::new(message))))
}

/// GET /user/all
pub async fn all_users(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<UsersResponse>> {
    let users = state.db.list_users().await?;
    Ok(Json(UsersResponse::new(users)))
}

/// GET /user/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>> {
    let user = state.db.find_user(&id).await?.ok_or_else(|| not_found("User"))?;
    Ok(Json(UserResponse::new(user)))
}

/// DELETE /user/:id
pub async fn delete_user(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let user = state.db.delete_user(&id).await?.ok_or_else(|| not_found("User"))?;
    info!(user_id = %user.id, by = %admin.id, "user deleted");

    state
        .cache
        .invalidate(&InvalidationRequest::new().admin())
        .await;

    Ok(Json(MessageResponse::new("User deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{test_state, ADMIN_ID, CUSTOMER_ID};
    use crate::cache::keys;
    use crate::models::Role;

    fn request(id: &str) -> NewUserRequest {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "name": "Asha",
            "email": "asha@example.com",
            "image": "asha.png",
            "gender": "female",
            "dob": "1999-02-11",
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_new_user_created() {
        let state = test_state().await;

        let (status, Json(body)) = new_user(State(state.clone()), Json(request("u-new")))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.message, "Welcome, Asha");

        let stored = state.db.find_user("u-new").await.unwrap().unwrap();
        assert_eq!(stored.role, Role::User);
    }

    #[tokio::test]
    async fn test_new_user_existing_id_greets() {
        let state = test_state().await;

        let (status, Json(body)) = new_user(State(state), Json(request(CUSTOMER_ID)))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.message, format!("Welcome, {CUSTOMER_ID} name"));
    }

    #[tokio::test]
    async fn test_new_user_missing_fields() {
        let state = test_state().await;
        let req = NewUserRequest {
            id: Some("u-bad".to_string()),
            ..NewUserRequest::default()
        };

        let err = new_user(State(state), Json(req)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Please fill all the fields");
    }

    #[tokio::test]
    async fn test_new_user_invalidates_dashboard() {
        let state = test_state().await;
        state.cache.set(keys::STATS, "{}".to_string()).await;

        new_user(State(state.clone()), Json(request("u-new"))).await.unwrap();
        assert!(!state.cache.has(keys::STATS).await);
    }

    #[tokio::test]
    async fn test_get_and_delete_user() {
        let state = test_state().await;
        let admin = AdminUser(state.db.find_user(ADMIN_ID).await.unwrap().unwrap());

        let Json(found) = get_user(State(state.clone()), Path(CUSTOMER_ID.to_string()))
            .await
            .unwrap();
        assert_eq!(found.user.id, CUSTOMER_ID);

        delete_user(admin.clone(), State(state.clone()), Path(CUSTOMER_ID.to_string()))
            .await
            .unwrap();
        let err = get_user(State(state.clone()), Path(CUSTOMER_ID.to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = delete_user(admin, State(state), Path(CUSTOMER_ID.to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
