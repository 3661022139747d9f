//! User entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::api_key::ApiKeyRecord;
use crate::domain::session::SessionOption;

/// A journal account.
///
/// Credential material beyond the password hash lives in the embedded
/// [`ApiKeyRecord`]; every user owns exactly one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    user_id: String,
    username: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing)]
    #[serde(default)]
    password_hash: String,
    api_key: ApiKeyRecord,
    session_option: SessionOption,
    created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        user_id: impl Into<String>,
        username: impl Into<String>,
        password_hash: impl Into<String>,
        api_key: ApiKeyRecord,
        session_option: SessionOption,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            password_hash: password_hash.into(),
            api_key,
            session_option,
            created_at: Utc::now(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn api_key(&self) -> &ApiKeyRecord {
        &self.api_key
    }

    pub fn session_option(&self) -> SessionOption {
        self.session_option
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replace the user's API key (rotation or administrative re-issue)
    pub fn set_api_key(&mut self, api_key: ApiKeyRecord) {
        self.api_key = api_key;
    }

    pub fn set_session_option(&mut self, option: SessionOption) {
        self.session_option = option;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_key() -> ApiKeyRecord {
        let now = Utc::now();
        ApiKeyRecord::new("sk_userkey", now, now, now + Duration::days(90))
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User::new(
            "user-1",
            "pat",
            "$argon2id$v=19$secret",
            test_key(),
            SessionOption::Daily,
        );

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password_hash"));
        assert!(json.contains("pat"));
    }

    #[test]
    fn test_set_api_key_replaces_record() {
        let mut user = User::new("user-1", "pat", "hash", test_key(), SessionOption::Weekly);
        let old_key = user.api_key().key().to_string();

        let now = Utc::now();
        user.set_api_key(ApiKeyRecord::new(
            "sk_rotated",
            now,
            now,
            now + Duration::days(90),
        ));

        assert_ne!(user.api_key().key(), old_key);
        assert_eq!(user.api_key().key(), "sk_rotated");
    }
}
