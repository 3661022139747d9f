use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid session option: {message}")]
    InvalidSessionOption { message: String },

    #[error("Missing credential: {message}")]
    MissingCredential { message: String },

    #[error("Malformed credential: {message}")]
    MalformedCredential { message: String },

    #[error("Invalid signature: {message}")]
    InvalidSignature { message: String },

    #[error("Credential expired: {message}")]
    Expired { message: String },

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Upstream store error: {message}")]
    UpstreamStore { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn invalid_session_option(message: impl Into<String>) -> Self {
        Self::InvalidSessionOption {
            message: message.into(),
        }
    }

    pub fn missing_credential(message: impl Into<String>) -> Self {
        Self::MissingCredential {
            message: message.into(),
        }
    }

    pub fn malformed_credential(message: impl Into<String>) -> Self {
        Self::MalformedCredential {
            message: message.into(),
        }
    }

    pub fn invalid_signature(message: impl Into<String>) -> Self {
        Self::InvalidSignature {
            message: message.into(),
        }
    }

    pub fn expired(message: impl Into<String>) -> Self {
        Self::Expired {
            message: message.into(),
        }
    }

    pub fn upstream_store(message: impl Into<String>) -> Self {
        Self::UpstreamStore {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// True for failures of a presented credential itself.
    ///
    /// These all surface as 401 with a category-level message only, so a
    /// caller cannot distinguish an unknown key from a bad signature beyond
    /// the broad category.
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential { .. }
                | Self::MalformedCredential { .. }
                | Self::InvalidSignature { .. }
                | Self::Expired { .. }
                | Self::InvalidApiKey
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = DomainError::expired("API key has expired");
        assert_eq!(err.to_string(), "Credential expired: API key has expired");

        assert_eq!(DomainError::InvalidApiKey.to_string(), "Invalid API key");
        assert_eq!(DomainError::RateLimited.to_string(), "Rate limit exceeded");
    }

    #[test]
    fn test_credential_failure_classification() {
        assert!(DomainError::InvalidApiKey.is_credential_failure());
        assert!(DomainError::expired("x").is_credential_failure());
        assert!(DomainError::missing_credential("x").is_credential_failure());
        assert!(!DomainError::RateLimited.is_credential_failure());
        assert!(!DomainError::upstream_store("x").is_credential_failure());
    }
}
