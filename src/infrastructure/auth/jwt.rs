//! Session token issuance and validation

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::{DomainError, SessionOption};

/// Claims embedded in a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Username the token asserts
    pub username: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

/// Configuration for the token issuer
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for the symmetric MAC
    pub secret: String,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
        }
    }
}

/// Issues and verifies short-lived session tokens.
///
/// Tokens are self-contained HS256 JWTs; expiry is the only invalidation
/// mechanism, there is no revocation list.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Create a new token issuer with the given configuration
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            encoding_key,
            decoding_key,
        }
    }

    /// Issue a signed session token for a username.
    ///
    /// The session option fixes the token lifetime; issuance itself never
    /// touches the backing store.
    pub fn issue_token(
        &self,
        username: &str,
        option: SessionOption,
    ) -> Result<String, DomainError> {
        let now = Utc::now();
        let claims = SessionClaims {
            username: username.to_string(),
            iat: now.timestamp(),
            exp: (now + option.token_ttl()).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify a session token and return its claims.
    ///
    /// Rejects tokens with a bad signature, a missing `exp` claim, or an
    /// expiry in the past. No leeway: one second past expiry is expired.
    pub fn validate_token(&self, token: &str) -> Result<SessionClaims, DomainError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let token_data =
            decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => DomainError::expired("Token has expired"),
                    ErrorKind::InvalidSignature => {
                        DomainError::invalid_signature("Token signature verification failed")
                    }
                    ErrorKind::MissingRequiredClaim(_) => {
                        DomainError::malformed_credential("Token is missing required claims")
                    }
                    _ => DomainError::malformed_credential(format!("Invalid token: {}", e)),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn create_service() -> JwtService {
        JwtService::new(JwtConfig::new("test-secret-key-12345"))
    }

    fn encode_raw(claims: &serde_json::Value, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_and_validate() {
        let service = create_service();

        let token = service.issue_token("pat", SessionOption::Daily).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.username, "pat");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_ttl_per_session_option() {
        let service = create_service();
        let cases = [
            (SessionOption::Daily, Duration::hours(24)),
            (SessionOption::Weekly, Duration::days(7)),
            (SessionOption::Monthly, Duration::days(30)),
            (SessionOption::Never, Duration::minutes(1)),
            (SessionOption::Always, Duration::days(3650)),
        ];

        for (option, ttl) in cases {
            let issued_at = Utc::now().timestamp();
            let token = service.issue_token("pat", option).unwrap();
            let claims = service.validate_token(&token).unwrap();

            let expected = issued_at + ttl.num_seconds();
            assert!(
                (claims.exp - expected).abs() <= 1,
                "{} ttl off by {}s",
                option,
                claims.exp - expected
            );
        }
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service1 = JwtService::new(JwtConfig::new("secret-1"));
        let service2 = JwtService::new(JwtConfig::new("secret-2"));

        let token = service1.issue_token("pat", SessionOption::Daily).unwrap();

        let err = service2.validate_token(&token).unwrap_err();
        assert!(matches!(err, DomainError::InvalidSignature { .. }));
    }

    #[test]
    fn test_expiry_boundary() {
        let service = create_service();
        let now = Utc::now().timestamp();

        // Expired one second ago: rejected
        let expired = encode_raw(
            &serde_json::json!({"username": "pat", "iat": now - 60, "exp": now - 1}),
            "test-secret-key-12345",
        );
        let err = service.validate_token(&expired).unwrap_err();
        assert!(matches!(err, DomainError::Expired { .. }));

        // Expires one second from now: accepted
        let fresh = encode_raw(
            &serde_json::json!({"username": "pat", "iat": now, "exp": now + 1}),
            "test-secret-key-12345",
        );
        assert!(service.validate_token(&fresh).is_ok());
    }

    #[test]
    fn test_missing_exp_claim_rejected() {
        let service = create_service();

        let token = encode_raw(
            &serde_json::json!({"username": "pat", "iat": Utc::now().timestamp()}),
            "test-secret-key-12345",
        );

        assert!(service.validate_token(&token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = create_service();

        assert!(service.validate_token("not-a-token").is_err());
        assert!(service.validate_token("").is_err());
        assert!(service.validate_token("a.b.c").is_err());
    }
}
