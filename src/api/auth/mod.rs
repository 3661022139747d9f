//! Account endpoints
//!
//! Registration and login are the only routes outside the authorization
//! pipeline; they are where session tokens and initial API keys come from.

use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::SessionOption;
use crate::infrastructure::user::RegisterUserRequest;

/// Create the account router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub session_option: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: String,
    pub username: String,
    pub token: String,
    /// Shown once at creation; afterwards only rotation re-delivers a key
    pub api_key: String,
    pub expires_at: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub session_option: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub token: String,
    pub expires_at: String,
}

/// Create an account with its initial API key
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let option = SessionOption::parse(&request.session_option)?;

    let user = state
        .user_service
        .register(RegisterUserRequest {
            username: request.username,
            password: request.password,
            session_option: option,
        })
        .await?;

    let token = state.jwt_service.issue_token(user.username(), option)?;
    let expires_at = Utc::now() + option.token_ttl();

    Ok(Json(RegisterResponse {
        user_id: user.user_id().to_string(),
        username: user.username().to_string(),
        token,
        api_key: user.api_key().key().to_string(),
        expires_at: expires_at.to_rfc3339(),
    }))
}

/// Authenticate and receive a session token
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let option = SessionOption::parse(&request.session_option)?;

    let user = state
        .user_service
        .authenticate(&request.username, &request.password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid username or password"))?;

    let token = state.jwt_service.issue_token(user.username(), option)?;
    let expires_at = Utc::now() + option.token_ttl();

    // Remember the chosen option for the account; not worth failing a
    // successful login over.
    if let Err(e) = state
        .user_repository
        .update_session_option(user.username(), option)
        .await
    {
        warn!(error = %e, "Failed to persist session option");
    }

    Ok(Json(LoginResponse {
        username: user.username().to_string(),
        token,
        expires_at: expires_at.to_rfc3339(),
    }))
}
