// ABOUTME: JWT-based user authentication and authorization system
// ABOUTME: Handles token generation, validation, and password hashing
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Authentication and Session Management
//!
//! This module provides JWT-based authentication for the multi-tenant
//! Agendly server. Access tokens are HS256-signed with the configured
//! application secret; passwords are hashed with bcrypt.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::User;

/// Bcrypt cost factor for password hashing
const BCRYPT_COST: u32 = 8;

/// `JWT` validation error with detailed information
#[derive(Debug, Clone)]
pub enum JwtValidationError {
    /// Token has expired
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
        /// Current time for reference
        current_time: DateTime<Utc>,
    },
    /// Token signature is invalid
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is malformed (not proper `JWT` format)
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl std::fmt::Display for JwtValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TokenExpired {
                expired_at,
                current_time,
            } => {
                let duration_expired = current_time.signed_duration_since(*expired_at);
                if duration_expired.num_minutes() < 60 {
                    write!(
                        f,
                        "JWT token expired {} minutes ago at {}",
                        duration_expired.num_minutes(),
                        expired_at.format("%Y-%m-%d %H:%M:%S UTC")
                    )
                } else {
                    write!(
                        f,
                        "JWT token expired {} hours ago at {}",
                        duration_expired.num_hours(),
                        expired_at.format("%Y-%m-%d %H:%M:%S UTC")
                    )
                }
            }
            Self::TokenInvalid { reason } => {
                write!(f, "JWT token signature is invalid: {reason}")
            }
            Self::TokenMalformed { details } => {
                write!(f, "JWT token is malformed: {details}")
            }
        }
    }
}

impl std::error::Error for JwtValidationError {}

/// `JWT` claims for user authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User `ID`
    pub sub: String,
    /// User email
    pub email: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Authentication result with user context
#[derive(Debug, Clone)]
pub struct AuthResult {
    /// Authenticated user `ID`
    pub user_id: Uuid,
    /// Authenticated user email
    pub email: String,
}

/// Authentication manager for `JWT` tokens and password hashing
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
}

impl AuthManager {
    /// Create a new authentication manager from the application secret
    #[must_use]
    pub fn new(jwt_secret: &str, token_expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            token_expiry_hours,
        }
    }

    /// Access token lifetime in seconds, reported to clients
    #[must_use]
    pub const fn expires_in_secs(&self) -> i64 {
        self.token_expiry_hours * 3600
    }

    /// Generate a `JWT` access token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn generate_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let expiry = now + Duration::hours(self.token_expiry_hours);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("failed to encode JWT")
    }

    /// Validate a `JWT` access token and return its claims
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] describing why the token was rejected
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let validation = Validation::new(Algorithm::HS256);

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    // Recover the expiry for a precise error message
                    let expired_at = Self::extract_expiry(token).unwrap_or_else(Utc::now);
                    Err(JwtValidationError::TokenExpired {
                        expired_at,
                        current_time: Utc::now(),
                    })
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    Err(JwtValidationError::TokenInvalid {
                        reason: "signature verification failed".into(),
                    })
                }
                other => Err(JwtValidationError::TokenMalformed {
                    details: format!("{other:?}"),
                }),
            },
        }
    }

    /// Validate a token and resolve the authenticated user identity
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] for bad tokens, including a subject
    /// that is not a valid UUID
    pub fn authenticate(&self, token: &str) -> Result<AuthResult, JwtValidationError> {
        let claims = self.validate_token(token)?;
        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|e| JwtValidationError::TokenMalformed {
                details: format!("subject is not a UUID: {e}"),
            })?;

        Ok(AuthResult {
            user_id,
            email: claims.email,
        })
    }

    /// Decode claims without verifying expiry, used for error reporting only
    fn extract_expiry(token: &str) -> Option<DateTime<Utc>> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.insecure_disable_signature_validation();

        decode::<Claims>(token, &DecodingKey::from_secret(b""), &validation)
            .ok()
            .and_then(|data| DateTime::from_timestamp(data.claims.exp, 0))
    }
}

/// Hash a password for storage
///
/// # Errors
///
/// Returns an error if bcrypt fails internally
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, BCRYPT_COST).context("failed to hash password")
}

/// Verify a password against its stored hash
///
/// # Errors
///
/// Returns an error if the stored hash is malformed
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    bcrypt::verify(password, password_hash).context("failed to verify password")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Test Owner".into(),
            email: "owner@example.com".into(),
            password_hash: String::new(),
            cell_phone: "5511999990000".into(),
            tax_id: "12345678901".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_token_generation_and_validation() {
        let manager = AuthManager::new("test-secret", 24);
        let user = test_user();

        let token = manager.generate_token(&user).unwrap();
        let auth = manager.authenticate(&token).unwrap();

        assert_eq!(auth.user_id, user.id);
        assert_eq!(auth.email, user.email);
    }

    #[test]
    fn test_expired_token_rejection() {
        let manager = AuthManager::new("test-secret", -1);
        let user = test_user();

        let token = manager.generate_token(&user).unwrap();
        let result = manager.validate_token(&token);

        assert!(matches!(
            result,
            Err(JwtValidationError::TokenExpired { .. })
        ));
    }

    #[test]
    fn test_wrong_secret_rejection() {
        let manager = AuthManager::new("test-secret", 24);
        let other = AuthManager::new("other-secret", 24);
        let user = test_user();

        let token = manager.generate_token(&user).unwrap();
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn test_garbage_token_rejection() {
        let manager = AuthManager::new("test-secret", 24);
        assert!(matches!(
            manager.validate_token("not-a-jwt"),
            Err(JwtValidationError::TokenMalformed { .. })
        ));
    }

    #[test]
    fn test_password_hashing_round_trip() {
        let hash = hash_password("hunter22").unwrap();
        assert!(verify_password("hunter22", &hash).unwrap());
        assert!(!verify_password("hunter23", &hash).unwrap());
    }
}
