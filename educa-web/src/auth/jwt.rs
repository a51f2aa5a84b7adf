//! JWT credential codec
//!
//! HS256 tokens carrying `{sub, iat, exp}`. The signing secret is injected
//! once at construction and never changes for the life of the codec.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// JWT signing and verification keys
struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Keys {
    fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration time (unix seconds)
    pub exp: i64,
}

impl Claims {
    pub fn new(subject: impl Into<String>, issued_at: i64, ttl: Duration) -> Self {
        Self {
            sub: subject.into(),
            iat: issued_at,
            exp: issued_at + ttl.num_seconds(),
        }
    }

    /// Expired once `now` is strictly past `exp`
    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.exp
    }
}

/// Why a token was rejected. Only ever logged; clients see "unauthorized".
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token signature does not match")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is malformed")]
    Malformed,
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("JWT secret must not be empty")]
    MissingSecret,
    #[error("Token creation failed")]
    TokenCreation,
    #[error("Password hashing failed")]
    PasswordHash,
}

/// Issues and verifies bearer tokens
pub struct TokenCodec {
    keys: Keys,
    validation: Validation,
    default_ttl: Duration,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(secret: &str, default_ttl: Duration) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::MissingSecret);
        }

        // Expiry is checked by `verify_at` so that it can be driven by an
        // explicit clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Ok(Self {
            keys: Keys::new(secret.as_bytes()),
            validation,
            default_ttl,
        })
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String, AuthError> {
        self.issue_at(subject, ttl, Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `issued_at`
    pub fn issue_at(
        &self,
        subject: &str,
        ttl: Duration,
        issued_at: i64,
    ) -> Result<String, AuthError> {
        let claims = Claims::new(subject, issued_at, ttl);
        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding).map_err(|e| {
            warn!("Failed to encode JWT token: {}", e);
            AuthError::TokenCreation
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify signature and expiry against the clock value `now`
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.keys.decoding, &self.validation).map_err(|e| {
            debug!("Token verification failed: {}", e);
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;

        if data.claims.is_expired_at(now) {
            debug!("Token for '{}' expired at {}", data.claims.sub, data.claims.exp);
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}
