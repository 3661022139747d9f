//! Authentication infrastructure

mod jwt;

pub use jwt::{JwtConfig, JwtService, SessionClaims};
