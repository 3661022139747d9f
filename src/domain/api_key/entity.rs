//! API key record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A long-lived API key owned by exactly one user.
///
/// The key value is opaque to everything but the generator. Records are never
/// mutated in place on rotation; the owning user gets a whole new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKeyRecord {
    /// Opaque key string (fixed prefix + random suffix)
    key: String,
    created_at: DateTime<Utc>,
    last_used_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl ApiKeyRecord {
    /// Create a record from its parts.
    ///
    /// Invariant: `expires_at` must be after `created_at`.
    pub fn new(
        key: impl Into<String>,
        created_at: DateTime<Utc>,
        last_used_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        debug_assert!(expires_at > created_at);
        Self {
            key: key.into(),
            created_at,
            last_used_at,
            expires_at,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_used_at(&self) -> DateTime<Utc> {
        self.last_used_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the key is past its expiry at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Refresh the last-used timestamp
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_used_at = now;
    }

    /// Identifying prefix of the key, safe to log
    pub fn display_prefix(&self) -> &str {
        let end = self.key.len().min(8);
        &self.key[..end]
    }
}
