//! Session token stage of the authorization pipeline
//!
//! Runs before the API-key stage: it needs no backend access, so invalid
//! callers are rejected before any store round-trip is spent on them.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;

use super::SessionUser;

/// Validate the bearer token and bind the asserted username into the request
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers())?;

    let claims = state.jwt_service.validate_token(&token)?;
    debug!(username = %claims.username, "Session token accepted");

    request
        .extensions_mut()
        .insert(SessionUser(claims.username));

    Ok(next.run(request).await)
}

/// Extract the token from `Authorization: Bearer <token>`
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let header_value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("Authorization header missing"))?;

    let value = header_value
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid authorization format"))?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(ApiError::unauthorized("Invalid authorization format")),
    }
}
