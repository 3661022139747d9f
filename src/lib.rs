//! Journey App Server
//!
//! Backend for the journaling application. This crate carries the
//! credential and access-control core: session token issuance and
//! verification, API key lifecycle with use-triggered rotation, and
//! per-key admission control, composed into the authorization pipeline
//! every protected route sits behind.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::UserRepository;
use infrastructure::api_key::{ApiKeyService, RateLimiterRegistry};
use infrastructure::auth::{JwtConfig, JwtService};
use infrastructure::user::{Argon2Hasher, InMemoryUserRepository, UserService};

/// Create the application state with all services initialized
pub fn create_app_state(config: &AppConfig) -> AppState {
    let user_repository: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
    create_app_state_with_store(config, user_repository)
}

/// Create the application state against a specific user store
pub fn create_app_state_with_store(
    config: &AppConfig,
    user_repository: Arc<dyn UserRepository>,
) -> AppState {
    let jwt_service = Arc::new(JwtService::new(JwtConfig::new(&config.auth.jwt_secret)));
    let api_key_service = Arc::new(ApiKeyService::new());
    let rate_limiters = Arc::new(RateLimiterRegistry::new());

    let user_service = Arc::new(UserService::new(
        user_repository.clone(),
        Arc::new(Argon2Hasher::new()),
        ApiKeyService::new(),
    ));

    AppState::new(
        jwt_service,
        api_key_service,
        rate_limiters,
        user_repository,
        user_service,
    )
}
