//! Password hashing and bearer token handling.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

/// Error types for hashing and token operations
#[derive(Error, Debug)]
pub enum SecurityError {
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("password hashing task failed: {0}")]
    Task(String),

    #[error("invalid token")]
    InvalidToken,

    #[error("token signing failed: {0}")]
    Signing(jsonwebtoken::errors::Error),
}

/// bcrypt based password hasher. The cost factor and salt are embedded in
/// every hash, so verification only needs the stored string.
#[derive(Clone, Copy, Debug)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash_password(&self, plaintext: &str) -> Result<String, SecurityError> {
        Ok(bcrypt::hash(plaintext, self.cost)?)
    }

    /// Returns false for a mismatch and for a malformed stored hash.
    pub fn check_password_hash(&self, plaintext: &str, hash: &str) -> bool {
        match bcrypt::verify(plaintext, hash) {
            Ok(matches) => matches,
            Err(e) => {
                debug!("Stored password hash could not be verified: {}", e);
                false
            }
        }
    }

    /// Hashes on the blocking pool so the runtime is not stalled by bcrypt.
    pub async fn hash(&self, plaintext: String) -> Result<String, SecurityError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash_password(&plaintext))
            .await
            .map_err(|e| {
                error!("Password hash task panicked: {}", e);
                SecurityError::Task(e.to_string())
            })?
    }

    pub async fn verify(&self, plaintext: String, hash: String) -> bool {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.check_password_hash(&plaintext, &hash))
            .await
            .unwrap_or_else(|e| {
                error!("Password verify task panicked: {}", e);
                false
            })
    }
}

/// Payload of issued bearer tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub email: String,
    /// Expiry, seconds since the epoch
    pub exp: i64,
    /// Issue time, seconds since the epoch
    pub iat: i64,
}

/// Issues and verifies HS256 tokens with a process-wide secret.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl fmt::Debug for JwtService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtService")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl JwtService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn generate_jwt(&self, user_id: Uuid, email: &str) -> Result<String, SecurityError> {
        let now = Utc::now();
        let claims = Claims {
            user_id,
            email: email.to_string(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            error!("Failed to encode JWT token: {}", e);
            SecurityError::Signing(e)
        })
    }

    /// Verifies signature and expiry. Every failure collapses to
    /// [`SecurityError::InvalidToken`].
    pub fn parse_jwt(&self, token: &str) -> Result<Claims, SecurityError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => debug!("Token expired"),
                    _ => debug!("Token validation failed: {}", e),
                }
                SecurityError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-characters-long";

    #[test]
    fn test_hash_is_salted_and_verifiable() {
        let hasher = PasswordHasher::new(4);

        let first = hasher.hash_password("Sup3r$ecret").unwrap();
        let second = hasher.hash_password("Sup3r$ecret").unwrap();

        assert_ne!(first, second);
        assert_ne!(first, "Sup3r$ecret");
        assert!(hasher.check_password_hash("Sup3r$ecret", &first));
        assert!(hasher.check_password_hash("Sup3r$ecret", &second));
        assert!(!hasher.check_password_hash("sup3r$ecret", &first));
    }

    #[test]
    fn test_malformed_hash_does_not_verify() {
        let hasher = PasswordHasher::new(4);

        assert!(!hasher.check_password_hash("anything", "not-a-bcrypt-hash"));
    }

    #[tokio::test]
    async fn test_async_hash_and_verify() {
        let hasher = PasswordHasher::new(4);

        let hash = hasher.hash("Passw0rd!".to_string()).await.unwrap();

        assert!(hasher.verify("Passw0rd!".to_string(), hash.clone()).await);
        assert!(!hasher.verify("Passw0rd?".to_string(), hash).await);
    }

    #[test]
    fn test_token_round_trip() {
        let service = JwtService::new(SECRET, Duration::hours(24));
        let user_id = Uuid::new_v4();

        let token = service.generate_jwt(user_id, "neo@example.com").unwrap();
        let claims = service.parse_jwt(&token).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.email, "neo@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = JwtService::new("another-secret-entirely", Duration::hours(1));
        let verifier = JwtService::new(SECRET, Duration::hours(1));

        let token = issuer.generate_jwt(Uuid::new_v4(), "neo@example.com").unwrap();

        assert!(matches!(verifier.parse_jwt(&token), Err(SecurityError::InvalidToken)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = JwtService::new(SECRET, Duration::hours(-2));

        let token = service.generate_jwt(Uuid::new_v4(), "neo@example.com").unwrap();

        assert!(matches!(service.parse_jwt(&token), Err(SecurityError::InvalidToken)));
    }

    #[test]
    fn test_malformed_token_is_rejected() {
        let service = JwtService::new(SECRET, Duration::hours(1));

        assert!(matches!(service.parse_jwt("not.a.jwt"), Err(SecurityError::InvalidToken)));
        assert!(matches!(service.parse_jwt(""), Err(SecurityError::InvalidToken)));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let service = JwtService::new(SECRET, Duration::hours(1));

        assert!(!format!("{:?}", service).contains(SECRET));
    }
}
