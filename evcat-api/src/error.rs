//! Error types for evcat-api
//!
//! Every failure leaves the service as `{"success": false, "message": ...}`.
//! Store errors are logged in full but reported with a generic message.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::search::SearchError;

/// Message returned for any store failure
pub const STORE_FAILURE_MESSAGE: &str = "Failed to execute query.";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Credentials rejected (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Conflict (409), e.g. username taken
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Relational store failure (500)
    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    /// Body missing, not JSON, or not the expected shape; keeps axum's
    /// status (400, 415 or 422)
    #[error("Invalid body: {0}")]
    InvalidBody(#[from] JsonRejection),
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::StoreQuery(e) => ApiError::Store(e),
            SearchError::InvalidReference(e) => ApiError::BadRequest(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Store(ref err) => {
                error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    STORE_FAILURE_MESSAGE.to_string(),
                )
            }
            ApiError::InvalidBody(rejection) => (rejection.status(), rejection.body_text()),
        };

        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}
