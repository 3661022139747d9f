//! Application state for shared services

use std::sync::Arc;

use crate::domain::UserRepository;
use crate::infrastructure::api_key::{ApiKeyService, RateLimiterRegistry};
use crate::infrastructure::auth::JwtService;
use crate::infrastructure::user::UserService;

/// Shared services, constructed once at startup and cloned into handlers.
///
/// Everything that was global state in earlier iterations (signing secret,
/// store handle, limiter registry) lives here so tests can swap in doubles.
#[derive(Clone)]
pub struct AppState {
    pub jwt_service: Arc<JwtService>,
    pub api_key_service: Arc<ApiKeyService>,
    pub rate_limiters: Arc<RateLimiterRegistry>,
    pub user_repository: Arc<dyn UserRepository>,
    pub user_service: Arc<UserService>,
}

impl AppState {
    pub fn new(
        jwt_service: Arc<JwtService>,
        api_key_service: Arc<ApiKeyService>,
        rate_limiters: Arc<RateLimiterRegistry>,
        user_repository: Arc<dyn UserRepository>,
        user_service: Arc<UserService>,
    ) -> Self {
        Self {
            jwt_service,
            api_key_service,
            rate_limiters,
            user_repository,
            user_service,
        }
    }
}
