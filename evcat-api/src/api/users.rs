//! User registration and login

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::db::users::{find_user, insert_user};
use crate::error::ApiError;
use crate::AppState;
use evcat_common::credentials::{hash_password, verify_password};

pub const MIN_PASSWORD_LEN: usize = 6;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Registration and login body
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub username: String,
}

/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let Json(credentials) = payload?;
    let username = credentials.username.trim();
    if username.is_empty() {
        return Err(ApiError::BadRequest("Username is required".to_string()));
    }
    if credentials.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let stored = hash_password(&credentials.password);
    match insert_user(&state.db, username, &stored).await {
        Ok(guid) => {
            info!(username = %username, guid = %guid, "User registered");
            Ok((
                StatusCode::CREATED,
                Json(RegisterResponse {
                    success: true,
                    message: "User registered successfully".to_string(),
                }),
            ))
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(ApiError::Conflict(
            format!("Username already taken: {}", username),
        )),
        Err(e) => Err(e.into()),
    }
}

/// POST /api/login
///
/// Unknown users and wrong passwords get the same answer.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(credentials) = payload?;
    let username = credentials.username.trim();
    let user = find_user(&state.db, username).await?;

    match user {
        Some(user) if verify_password(&credentials.password, &user.password_hash, &user.password_salt) => {
            info!(username = %user.username, "User logged in");
            Ok(Json(LoginResponse {
                success: true,
                message: "Login successful".to_string(),
                username: user.username,
            }))
        }
        _ => {
            warn!(username = %username, "Login rejected");
            Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))
        }
    }
}
