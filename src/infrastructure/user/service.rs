//! User account service

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::{DomainError, SessionOption, User, UserRepository};
use crate::infrastructure::api_key::ApiKeyService;

use super::password::PasswordHasher;

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 50;
const PASSWORD_MIN: usize = 8;

/// Request for creating a new account
#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    pub username: String,
    pub password: String,
    pub session_option: SessionOption,
}

/// Account management on top of the user store
#[derive(Debug)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    api_keys: ApiKeyService,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        api_keys: ApiKeyService,
    ) -> Self {
        Self {
            repository,
            hasher,
            api_keys,
        }
    }

    /// Create a new account with its initial API key
    pub async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError> {
        validate_username(&request.username)?;
        validate_password(&request.password)?;

        if self.repository.username_exists(&request.username).await? {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                request.username
            )));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let api_key = self.api_keys.generate();

        let user = User::new(
            Uuid::new_v4().to_string(),
            &request.username,
            password_hash,
            api_key,
            request.session_option,
        );

        let created = self.repository.create(user).await?;
        info!(username = %created.username(), "User registered");
        Ok(created)
    }

    /// Check a username/password pair against the store.
    ///
    /// Returns `None` for both unknown users and wrong passwords; callers
    /// must not distinguish the two.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let user = match self.repository.find_by_username(username).await? {
            Some(u) => u,
            None => return Ok(None),
        };

        if !self.hasher.verify(password, user.password_hash()) {
            return Ok(None);
        }

        Ok(Some(user))
    }
}

fn validate_username(username: &str) -> Result<(), DomainError> {
    let len = username.chars().count();
    if len < USERNAME_MIN || len > USERNAME_MAX {
        return Err(DomainError::validation(format!(
            "Username must be {}-{} characters",
            USERNAME_MIN, USERNAME_MAX
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(DomainError::validation(
            "Username may only contain letters, digits, '-' and '_'",
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), DomainError> {
    if password.chars().count() < PASSWORD_MIN {
        return Err(DomainError::validation(format!(
            "Password must be at least {} characters",
            PASSWORD_MIN
        )));
    }
    Ok(())
}
