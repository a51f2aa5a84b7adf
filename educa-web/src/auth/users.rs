//! User store and login

use super::jwt::{AuthError, TokenCodec};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use educa_core::SeedUser;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

/// User login request. Both fields are optional on the wire so that a
/// missing one is reported as invalid credentials, not a parse failure.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "demo@demo.com")]
    pub email: Option<String>,
    #[schema(example = "1234")]
    pub password: Option<String>,
}

/// Successful login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

/// Stored user with password hash
#[derive(Debug, Clone)]
pub struct UserData {
    pub email: String,
    pub password_hash: String,
}

impl UserData {
    /// Create new user with hashed password
    pub fn new(email: impl Into<String>, password: &str) -> Result<Self, AuthError> {
        Ok(Self {
            email: email.into(),
            password_hash: hash_password(password)?,
        })
    }

    /// Verify password
    pub fn verify_password(&self, password: &str) -> bool {
        verify_password(password, &self.password_hash)
    }
}

/// Read-only user lookup keyed by exact email
#[derive(Debug, Clone, Default)]
pub struct UserStore {
    users: HashMap<String, UserData>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from configured seed users
    pub fn from_seed(seed: &[SeedUser]) -> Result<Self, AuthError> {
        let mut store = Self::new();
        for user in seed {
            store.insert(UserData::new(user.email.clone(), &user.password)?);
        }
        Ok(store)
    }

    pub fn insert(&mut self, user: UserData) {
        info!("Provisioning user: {}", user.email);
        self.users.insert(user.email.clone(), user);
    }

    pub fn get_user_by_email(&self, email: &str) -> Option<&UserData> {
        self.users.get(email)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// User authentication service
pub struct UserService {
    store: UserStore,
    codec: Arc<TokenCodec>,
    /// Verified against on unknown emails so both failure paths cost an
    /// argon2 verification
    dummy_hash: String,
}

impl UserService {
    pub fn new(store: UserStore, codec: Arc<TokenCodec>) -> Result<Self, AuthError> {
        Ok(Self {
            store,
            codec,
            dummy_hash: hash_password("educa-unknown-user")?,
        })
    }

    pub fn store(&self) -> &UserStore {
        &self.store
    }

    /// Check credentials and issue a token for the user's email
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AuthError> {
        let (email, password) = match (request.email, request.password) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                (email, password)
            }
            _ => {
                debug!("Login rejected: missing credentials");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let verified = match self.store.get_user_by_email(&email) {
            Some(user) => user.verify_password(&password),
            None => {
                verify_password(&password, &self.dummy_hash);
                false
            }
        };

        if !verified {
            warn!("Failed login attempt for: {}", email);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.codec.issue(&email, self.codec.default_ttl())?;
        info!("User logged in: {}", email);
        Ok(LoginResponse { token })
    }
}

/// Hash password using Argon2
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify password against hash. An unparsable hash never verifies.
fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn service() -> (UserService, Arc<TokenCodec>) {
        let codec = Arc::new(TokenCodec::new("test-secret", Duration::hours(24)).unwrap());
        let store = UserStore::from_seed(&[SeedUser {
            email: "demo@demo.com".into(),
            password: "1234".into(),
        }])
        .unwrap();
        (UserService::new(store, Arc::clone(&codec)).unwrap(), codec)
    }

    fn request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    #[tokio::test]
    async fn valid_credentials_yield_verifiable_token() {
        let (service, codec) = service();
        let response = service.login(request("demo@demo.com", "1234")).await.unwrap();

        let claims = codec.verify(&response.token).unwrap();
        assert_eq!(claims.sub, "demo@demo.com");
    }

    #[tokio::test]
    async fn wrong_password_unknown_email_and_missing_fields_are_rejected() {
        let (service, _) = service();

        for req in [
            request("demo@demo.com", "12345"),
            request("nadie@demo.com", "1234"),
            request("DEMO@demo.com", "1234"),
            request("demo@demo.com", ""),
            LoginRequest::default(),
        ] {
            assert!(matches!(
                service.login(req).await,
                Err(AuthError::InvalidCredentials)
            ));
        }
    }

    #[test]
    fn stored_hash_is_not_the_password() {
        let user = UserData::new("a@b.c", "secreto").unwrap();
        assert!(user.password_hash.starts_with("$argon2"));
        assert!(user.verify_password("secreto"));
        assert!(!user.verify_password("otro"));
    }

    #[test]
    fn each_hash_gets_a_fresh_salt() {
        let first = hash_password("1234").unwrap();
        let second = hash_password("1234").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("1234", &first));
        assert!(verify_password("1234", &second));
    }
}
