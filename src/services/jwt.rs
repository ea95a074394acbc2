//! # JWT Service
//!
//! This module provides JSON Web Token (JWT) functionality for user sessions.
//! It handles token creation and validation; revocation on logout is tracked
//! by fingerprint in the application state.
//!
//! ## Security
//!
//! - Tokens are HS256-signed with the `JWT_SECRET` key
//! - Tokens expire after [`ACCESS_TOKEN_EXPIRY`]
//! - Revoked tokens are remembered only by their SHA-256 fingerprint

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, instrument, trace};
use uuid::Uuid;

use crate::models::Role;
use crate::utils::constant::*;

/// Errors that can occur during JWT operations
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
}

/// JWT claims structure for session tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as string)
    pub sub: String,
    /// Role of the account at login time
    pub role: Role,
    /// Expiration timestamp (Unix epoch)
    pub exp: u64,
    /// Issued at timestamp (Unix epoch)
    pub iat: u64,
    /// Unique token id
    pub jti: String,
}

/// A freshly signed session token
#[derive(Debug, Serialize)]
pub struct IssuedToken {
    pub token: String,
    /// Token lifetime in seconds
    pub expires_in: u64,
}

/// Service for signing and verifying session tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// Creates a new JWT service with the provided keys.
    ///
    /// # Arguments
    ///
    /// * `encoding_key` - Key used for signing JWT tokens
    /// * `decoding_key` - Key used for verifying JWT tokens
    pub fn new(encoding_key: EncodingKey, decoding_key: DecodingKey) -> Self {
        Self {
            encoding_key,
            decoding_key,
        }
    }

    /// Convenience constructor for a shared HMAC secret.
    pub fn from_secret(secret: &[u8]) -> Self {
        Self::new(
            EncodingKey::from_secret(secret),
            DecodingKey::from_secret(secret),
        )
    }

    /// Signs a session token for the user.
    ///
    /// # Errors
    ///
    /// Returns [`JwtError::EncodingError`] if signing fails.
    #[instrument(skip(self))]
    pub fn issue(&self, user_id: Uuid, role: Role) -> Result<IssuedToken, JwtError> {
        trace!("Creating session token");

        let now = unix_now();
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            exp: now + ACCESS_TOKEN_EXPIRY.as_secs(),
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        trace!("Session token created");

        Ok(IssuedToken {
            token,
            expires_in: ACCESS_TOKEN_EXPIRY.as_secs(),
        })
    }

    /// Validates a session token and returns its claims.
    ///
    /// This method verifies the token signature and checks expiration.
    /// Revocation is checked separately by the authentication middleware.
    ///
    /// # Errors
    ///
    /// - [`JwtError::TokenExpired`] - Token has expired
    /// - [`JwtError::InvalidToken`] - Token is malformed or has invalid signature
    #[instrument(skip_all, fields(token_length = token.len()))]
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        trace!("Validating session token");

        match decode::<Claims>(token, &self.decoding_key, &Validation::default()) {
            Ok(token_data) => {
                trace!(user_id = %token_data.claims.sub, "Session token validated successfully");
                Ok(token_data.claims)
            }
            Err(e) if e.kind() == &jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                debug!("Session token expired");
                Err(JwtError::TokenExpired)
            }
            Err(e) => {
                debug!(error = %e, "Invalid session token");
                Err(JwtError::InvalidToken)
            }
        }
    }
}

/// Hex SHA-256 of a raw token, used as the key of the revocation list.
pub fn token_fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Seconds since the Unix epoch.
pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
