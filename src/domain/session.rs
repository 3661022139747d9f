//! Session lifetime options

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::DomainError;

/// How long a session token issued at login should live.
///
/// `Never` is deliberately short lived: it backs single-use flows where the
/// client does not want the session remembered at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionOption {
    Always,
    Daily,
    Weekly,
    Monthly,
    Never,
}

impl SessionOption {
    /// Parse a client-supplied option string
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "always" => Ok(Self::Always),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "never" => Ok(Self::Never),
            other => Err(DomainError::invalid_session_option(format!(
                "'{}' is not a recognized session option",
                other
            ))),
        }
    }

    /// Token time-to-live for this option
    pub fn token_ttl(&self) -> Duration {
        match self {
            Self::Always => Duration::days(3650),
            Self::Daily => Duration::hours(24),
            Self::Weekly => Duration::days(7),
            Self::Monthly => Duration::days(30),
            Self::Never => Duration::minutes(1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Never => "never",
        }
    }
}

impl std::fmt::Display for SessionOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SessionOption {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
