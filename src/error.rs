//! Error types for the API
//!
//! Every handler funnels its failures through [`ApiError`], which maps each
//! variant to an HTTP status and a `{ success: false, message }` body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::db::StoreError;
use crate::models::ErrorResponse;
use crate::payment::PaymentError;

/// Message returned for every 5xx response.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";
pub const NOT_FOUND_MESSAGE: &str = "Not found";

// == Api Error Enum ==
/// Unified error type for the HTTP layer.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Entity id has no matching record
    #[error("{0}")]
    NotFound(String),

    /// Missing or malformed request data
    #[error("{0}")]
    Validation(String),

    /// No actor id supplied
    #[error("{0}")]
    Unauthorized(String),

    /// Actor is known but lacks the admin role
    #[error("{0}")]
    Forbidden(String),

    /// Document store rejected the call
    #[error("store failure: {0}")]
    Store(#[from] StoreError),

    /// Payment gateway rejected the call
    #[error("{0}")]
    Payment(#[from] PaymentError),

    /// Anything else
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Store(StoreError::Duplicate(_)) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::Missing(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Payment(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            _ if status.is_server_error() => {
                error!(error = %self, "request failed");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            // Record vanished between lookup and write
            ApiError::Store(StoreError::Missing(_)) => NOT_FOUND_MESSAGE.to_string(),
            _ => self.to_string(),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
