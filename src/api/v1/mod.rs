//! Protected API surface
//!
//! Every route in this router sits behind the full authorization pipeline.
//! Journal content handlers mount here; `/session` reflects the bound
//! context back so clients can inspect what they are authorized as.

use axum::{routing::get, Extension, Json, Router};
use serde::Serialize;

use crate::api::middleware::{ClientApiKey, SessionUser};
use crate::api::state::AppState;

pub fn create_v1_router() -> Router<AppState> {
    Router::new().route("/session", get(session_info))
}

#[derive(Debug, Serialize)]
pub struct SessionInfoResponse {
    pub username: String,
    pub api_key_prefix: String,
    pub api_key_expires_at: String,
}

/// GET /v1/session - the authorization context of this request
pub async fn session_info(
    Extension(SessionUser(username)): Extension<SessionUser>,
    Extension(ClientApiKey(api_key)): Extension<ClientApiKey>,
) -> Json<SessionInfoResponse> {
    Json(SessionInfoResponse {
        username,
        api_key_prefix: api_key.display_prefix().to_string(),
        api_key_expires_at: api_key.expires_at().to_rfc3339(),
    })
}
