//! API key generation
//!
//! Generates cryptographically secure API keys.

use chrono::{Duration, Utc};
use rand::RngCore;

use crate::domain::ApiKeyRecord;

/// Prefix identifying keys issued by this service
pub const KEY_PREFIX: &str = "sk_";

/// Random bytes per key; 32 bytes gives 256 bits of entropy
const KEY_BYTES: usize = 32;

/// Generator for secure API keys
#[derive(Debug, Clone)]
pub struct ApiKeyGenerator {
    prefix: String,
    /// How long a freshly generated key lives before it expires
    lifetime: Duration,
}

impl ApiKeyGenerator {
    /// Create a generator issuing keys valid for `lifetime`
    pub fn new(lifetime: Duration) -> Self {
        Self {
            prefix: KEY_PREFIX.to_string(),
            lifetime,
        }
    }

    /// Override the key prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Generate a fresh API key record.
    ///
    /// The key string is the prefix followed by 64 hex characters of
    /// OS-sourced randomness; collisions are negligible.
    pub fn generate(&self) -> ApiKeyRecord {
        let mut random_bytes = [0u8; KEY_BYTES];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        let key = format!("{}{}", self.prefix, hex::encode(random_bytes));

        let now = Utc::now();
        ApiKeyRecord::new(key, now, now, now + self.lifetime)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}
