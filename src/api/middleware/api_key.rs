//! API key stage of the authorization pipeline
//!
//! Store lookup, expiry check, per-key admission control, last-used refresh
//! and use-triggered rotation. The lookup is mandatory; the two writes are
//! best-effort and never fail the request.

use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::{ApiKeyRecord, DomainError, User};

use super::{ClientApiKey, SessionUser};

/// Header carrying the client's API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Response header delivering a freshly rotated key to the client
pub const ROTATED_KEY_HEADER: &str = "x-rotated-api-key";

/// Bound on every user-store call made from this stage
const STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Validate the API key, admit the request through its rate limiter, and
/// bind the owning user into the request.
pub async fn require_api_key(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = extract_api_key(request.headers())?;

    let user = lookup_owner(&state, &presented).await?;

    state.api_key_service.validate(user.api_key())?;

    let limiter = state.rate_limiters.get_limiter(&presented).await;
    if !limiter.allow() {
        warn!(username = %user.username(), "Rate limit exceeded");
        return Err(DomainError::RateLimited.into());
    }

    refresh_last_used(&state, &presented).await;

    let active_key = match rotate_if_needed(&state, &user, &presented).await {
        Some(replacement) => replacement,
        None => user.api_key().clone(),
    };
    let rotated = (active_key.key() != presented).then(|| active_key.key().to_string());

    request
        .extensions_mut()
        .insert(SessionUser(user.username().to_string()));
    request.extensions_mut().insert(ClientApiKey(active_key));

    let mut response = next.run(request).await;

    if let Some(new_key) = rotated {
        match HeaderValue::from_str(&new_key) {
            Ok(value) => {
                response.headers_mut().insert(ROTATED_KEY_HEADER, value);
            }
            Err(e) => warn!(error = %e, "Rotated key not representable as a header value"),
        }
    }

    Ok(response)
}

/// Extract the key from the `X-API-Key` header
fn extract_api_key(headers: &HeaderMap) -> Result<String, ApiError> {
    let header_value = headers
        .get(API_KEY_HEADER)
        .ok_or_else(|| ApiError::unauthorized("API key missing"))?;

    let key = header_value
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid API key"))?
        .trim();

    if key.is_empty() {
        return Err(ApiError::unauthorized("API key missing"));
    }

    Ok(key.to_string())
}

/// Mandatory store lookup. A miss is reported with the same generic message
/// as any other bad key, so the endpoint cannot be used to probe which keys
/// exist; a store failure or timeout is a hard 500.
async fn lookup_owner(state: &AppState, key: &str) -> Result<User, ApiError> {
    match timeout(STORE_TIMEOUT, state.user_repository.find_by_api_key(key)).await {
        Ok(Ok(Some(user))) => Ok(user),
        Ok(Ok(None)) => {
            debug!("No user found for presented API key");
            Err(DomainError::InvalidApiKey.into())
        }
        Ok(Err(e)) => {
            warn!(error = %e, "User store lookup failed");
            Err(DomainError::upstream_store(e.to_string()).into())
        }
        Err(_) => {
            warn!("User store lookup timed out");
            Err(DomainError::upstream_store("lookup timed out").into())
        }
    }
}

/// Best-effort last-used refresh; failure is logged and swallowed
async fn refresh_last_used(state: &AppState, key: &str) {
    match timeout(
        STORE_TIMEOUT,
        state.user_repository.update_api_key_last_used(key, Utc::now()),
    )
    .await
    {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "Failed to refresh API key last-used time"),
        Err(_) => warn!("Timed out refreshing API key last-used time"),
    }
}

/// Rotate the key if it has aged past the threshold.
///
/// Returns the persisted replacement record, or `None` when no rotation
/// happened. A failed or timed-out rotation leaves the request on the
/// still-valid original key.
async fn rotate_if_needed(
    state: &AppState,
    user: &User,
    presented: &str,
) -> Option<ApiKeyRecord> {
    if !state.api_key_service.needs_rotation(user.api_key()) {
        return None;
    }

    let replacement = state.api_key_service.generate();

    match timeout(
        STORE_TIMEOUT,
        state.user_repository.update_api_key(presented, &replacement),
    )
    .await
    {
        Ok(Ok(())) => {
            info!(username = %user.username(), "API key rotated");
            Some(replacement)
        }
        Ok(Err(e)) => {
            warn!(error = %e, "API key rotation failed; request continues on existing key");
            None
        }
        Err(_) => {
            warn!("API key rotation timed out; request continues on existing key");
            None
        }
    }
}
