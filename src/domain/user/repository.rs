//! User store collaborator contract

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Debug;

use super::entity::User;
use crate::domain::api_key::ApiKeyRecord;
use crate::domain::session::SessionOption;
use crate::domain::DomainError;

/// Backing store for user accounts and their credentials.
///
/// The access-control core only ever reads and writes users through this
/// trait; the store itself (SQL, document, in-memory) is a collaborator.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Look up the user owning an API key, by key value
    async fn find_by_api_key(&self, key: &str) -> Result<Option<User>, DomainError>;

    /// Look up a user by username (for login)
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Refresh the last-used timestamp of an API key
    async fn update_api_key_last_used(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError>;

    /// Replace an API key with a freshly rotated record
    async fn update_api_key(
        &self,
        old_key: &str,
        new_record: &ApiKeyRecord,
    ) -> Result<(), DomainError>;

    /// Persist a user's preferred session option
    async fn update_session_option(
        &self,
        username: &str,
        option: SessionOption,
    ) -> Result<(), DomainError>;

    /// Whether a username is already taken
    async fn username_exists(&self, username: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_username(username).await?.is_some())
    }
}
