//! API layer - HTTP endpoints and the authorization pipeline

pub mod auth;
pub mod health;
pub mod middleware;
pub mod router;
pub mod state;
pub mod types;
pub mod v1;

pub use router::{create_router_with_state, with_auth_chain};
pub use state::AppState;
