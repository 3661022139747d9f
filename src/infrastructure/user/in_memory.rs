//! In-memory user store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::api_key::ApiKeyRecord;
use crate::domain::session::SessionOption;
use crate::domain::{DomainError, User, UserRepository};

/// In-memory implementation of [`UserRepository`].
///
/// Default store for serve mode; durable stores plug in behind the same
/// trait.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    /// Keyed by username
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        let map = users
            .into_iter()
            .map(|u| (u.username().to_string(), u))
            .collect();
        Self {
            users: Arc::new(RwLock::new(map)),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_api_key(&self, key: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.api_key().key() == key).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(username).cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        if users.contains_key(user.username()) {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                user.username()
            )));
        }
        users.insert(user.username().to_string(), user.clone());
        Ok(user)
    }

    async fn update_api_key_last_used(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        for user in users.values_mut() {
            if user.api_key().key() == key {
                let mut record = user.api_key().clone();
                record.touch(now);
                user.set_api_key(record);
                return Ok(());
            }
        }
        Ok(())
    }

    async fn update_api_key(
        &self,
        old_key: &str,
        new_record: &ApiKeyRecord,
    ) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        for user in users.values_mut() {
            if user.api_key().key() == old_key {
                user.set_api_key(new_record.clone());
                return Ok(());
            }
        }
        Err(DomainError::upstream_store(
            "No user found for the key being rotated",
        ))
    }

    async fn update_session_option(
        &self,
        username: &str,
        option: SessionOption,
    ) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        match users.get_mut(username) {
            Some(user) => {
                user.set_session_option(option);
                Ok(())
            }
            None => Err(DomainError::upstream_store(format!(
                "No user '{}' to update",
                username
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_user(username: &str, key: &str) -> User {
        let now = Utc::now();
        User::new(
            format!("id-{}", username),
            username,
            "hash",
            ApiKeyRecord::new(key, now, now, now + Duration::days(90)),
            SessionOption::Daily,
        )
    }

    #[tokio::test]
    async fn test_find_by_api_key() {
        let repo = InMemoryUserRepository::with_users(vec![
            test_user("ann", "sk_ann"),
            test_user("bob", "sk_bob"),
        ]);

        let found = repo.find_by_api_key("sk_bob").await.unwrap().unwrap();
        assert_eq!(found.username(), "bob");

        assert!(repo.find_by_api_key("sk_nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_username() {
        let repo = InMemoryUserRepository::new();
        repo.create(test_user("ann", "sk_1")).await.unwrap();

        let err = repo.create(test_user("ann", "sk_2")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_update_api_key_replaces_by_old_value() {
        let repo = InMemoryUserRepository::with_users(vec![test_user("ann", "sk_old")]);

        let now = Utc::now();
        let replacement = ApiKeyRecord::new("sk_new", now, now, now + Duration::days(90));
        repo.update_api_key("sk_old", &replacement).await.unwrap();

        assert!(repo.find_by_api_key("sk_old").await.unwrap().is_none());
        let user = repo.find_by_api_key("sk_new").await.unwrap().unwrap();
        assert_eq!(user.username(), "ann");
    }

    #[tokio::test]
    async fn test_update_last_used() {
        let repo = InMemoryUserRepository::with_users(vec![test_user("ann", "sk_ann")]);

        let later = Utc::now() + Duration::hours(2);
        repo.update_api_key_last_used("sk_ann", later).await.unwrap();

        let user = repo.find_by_username("ann").await.unwrap().unwrap();
        assert_eq!(user.api_key().last_used_at(), later);
    }
}
