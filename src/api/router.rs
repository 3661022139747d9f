use axum::{middleware as axum_middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::auth;
use super::health;
use super::middleware;
use super::state::AppState;
use super::v1;

/// Wrap a router in the two-stage authorization pipeline.
///
/// Layers run outside-in, so the session layer is added last: a request hits
/// the cheap token check before the API-key stage spends a store round-trip
/// and rate-limiter budget on it.
pub fn with_auth_chain(routes: Router<AppState>, state: &AppState) -> Router<AppState> {
    routes
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_api_key,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_session,
        ))
}

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    let protected = with_auth_chain(v1::create_v1_router(), &state);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .nest("/auth", auth::create_auth_router())
        .nest("/v1", protected)
        .with_state(state)
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
}
