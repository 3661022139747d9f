//! API key infrastructure - generation, validation, admission control

mod generator;
mod rate_limiter;
mod service;

pub use generator::{ApiKeyGenerator, KEY_PREFIX};
pub use rate_limiter::{RateLimiterRegistry, TokenBucket, BUCKET_CAPACITY, REFILL_RATE};
pub use service::{ApiKeyService, ROTATION_PERIOD_DAYS};
