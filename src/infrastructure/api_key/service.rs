//! API key lifecycle decisions
//!
//! Generation, expiry validation, and use-triggered rotation eligibility.
//! Persistence of the outcomes stays with the caller.

use chrono::{Duration, Utc};
use tracing::debug;

use crate::domain::{ApiKeyRecord, DomainError};

use super::generator::ApiKeyGenerator;

/// Keys are rotated after this long in service
pub const ROTATION_PERIOD_DAYS: i64 = 90;

/// Manages long-lived API keys
#[derive(Debug, Clone)]
pub struct ApiKeyService {
    generator: ApiKeyGenerator,
    rotation_period: Duration,
}

impl ApiKeyService {
    pub fn new() -> Self {
        let rotation_period = Duration::days(ROTATION_PERIOD_DAYS);
        Self {
            generator: ApiKeyGenerator::new(rotation_period),
            rotation_period,
        }
    }

    /// Generate a brand new key (account creation or rotation)
    pub fn generate(&self) -> ApiKeyRecord {
        self.generator.generate()
    }

    /// Check that a key is still usable.
    ///
    /// The caller persists the last-used refresh after a successful check.
    pub fn validate(&self, record: &ApiKeyRecord) -> Result<(), DomainError> {
        if record.is_expired(Utc::now()) {
            debug!(key_prefix = %record.display_prefix(), "API key past expiry");
            return Err(DomainError::expired("API key has expired"));
        }
        Ok(())
    }

    /// Whether a key has aged past the rotation threshold.
    ///
    /// Evaluated on every successful use; a key that sees no traffic is never
    /// rotated, only expired.
    pub fn needs_rotation(&self, record: &ApiKeyRecord) -> bool {
        Utc::now() > record.created_at() + self.rotation_period
    }
}

impl Default for ApiKeyService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn record_created_at(created: DateTime<Utc>) -> ApiKeyRecord {
        ApiKeyRecord::new("sk_test", created, created, created + Duration::days(90))
    }

    #[test]
    fn test_fresh_key_is_valid() {
        let service = ApiKeyService::new();
        let record = service.generate();

        assert!(service.validate(&record).is_ok());
        assert!(!service.needs_rotation(&record));
    }

    #[test]
    fn test_expired_key_rejected() {
        let service = ApiKeyService::new();
        let created = Utc::now() - Duration::days(91);
        let record = record_created_at(created);

        let err = service.validate(&record).unwrap_err();
        assert!(matches!(err, DomainError::Expired { .. }));
    }

    #[test]
    fn test_rotation_threshold() {
        let service = ApiKeyService::new();

        let at_89_days = record_created_at(Utc::now() - Duration::days(89));
        assert!(!service.needs_rotation(&at_89_days));

        let at_91_days = record_created_at(Utc::now() - Duration::days(91));
        assert!(service.needs_rotation(&at_91_days));
    }

    #[test]
    fn test_rotation_replacement_is_distinct_and_fresh() {
        let service = ApiKeyService::new();
        let old = record_created_at(Utc::now() - Duration::days(91));

        let replacement = service.generate();

        assert_ne!(replacement.key(), old.key());
        assert!(service.validate(&replacement).is_ok());
        assert!(!service.needs_rotation(&replacement));
    }
}
