//! Authorization pipeline and request logging
//!
//! The authorization pipeline is two ordered stages: the session-token
//! stage (no backend access) runs first, the API-key stage (store lookup,
//! admission control, rotation) second. A handler behind both layers only
//! ever runs with a fully bound context.

pub mod api_key;
pub mod logging;
pub mod session;

pub use api_key::{require_api_key, API_KEY_HEADER, ROTATED_KEY_HEADER};
pub use logging::logging_middleware;
pub use session::require_session;

use crate::domain::ApiKeyRecord;

/// Username resolved for this request, bound by the pipeline
#[derive(Debug, Clone)]
pub struct SessionUser(pub String);

/// API key the request runs under; the rotated record when rotation happened
#[derive(Debug, Clone)]
pub struct ClientApiKey(pub ApiKeyRecord);
