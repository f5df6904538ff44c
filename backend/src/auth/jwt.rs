//! JWT identity token issuance and validation
//!
//! Tokens are HS256-signed, carry the subject's id and email, and expire a
//! fixed time after issuance. There is no revocation list: a token stays
//! valid until `exp` no matter what happens to the user afterwards.

use crate::error::ApiError;
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Subject email
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Identity recovered from a valid token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub user_id: Uuid,
    pub email: String,
}

/// Pre-computed JWT keys for efficient token operations
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    /// Create new JWT keys from secret
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// JWT service for token operations
///
/// Keys are derived once and shared behind `Arc`, so clones are cheap.
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    validation: Validation,
    token_expiry_secs: i64,
}

impl JwtService {
    /// Create a new JWT service with pre-computed keys
    ///
    /// Call this once at application startup and store in AppState.
    pub fn new(secret: &str, token_expiry_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact: no grace period past `exp`
        validation.leeway = 0;

        Self {
            keys: JwtKeys::new(secret),
            validation,
            token_expiry_secs,
        }
    }

    /// Issue a token for a user, expiring `token_expiry_secs` from now
    #[inline]
    pub fn issue(&self, user_id: Uuid, email: &str) -> Result<String> {
        self.issue_at(user_id, email, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub(crate) fn issue_at(&self, user_id: Uuid, email: &str, now: DateTime<Utc>) -> Result<String> {
        let exp = now + Duration::seconds(self.token_expiry_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, self.keys.encoding())
            .map_err(|e| anyhow::anyhow!("Failed to sign token: {}", e))
    }

    /// Validate a token and return its subject
    ///
    /// Fails with `InvalidToken` on a bad signature, malformed structure,
    /// malformed subject, or expiry.
    pub fn validate(&self, token: &str) -> Result<TokenSubject, ApiError> {
        let token_data = decode::<Claims>(token, self.keys.decoding(), &self.validation)
            .map_err(|e| ApiError::InvalidToken(e.to_string()))?;

        let user_id = Uuid::parse_str(&token_data.claims.sub)
            .map_err(|_| ApiError::InvalidToken("Invalid user ID in token".to_string()))?;

        Ok(TokenSubject {
            user_id,
            email: token_data.claims.email,
        })
    }

    /// Get token lifetime in seconds
    #[inline]
    pub fn token_expiry_secs(&self) -> i64 {
        self.token_expiry_secs
    }
}
