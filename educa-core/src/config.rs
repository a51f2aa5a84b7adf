//! Configuration management
//!
//! Configuration is loaded once at process start (defaults, then an optional
//! TOML file, then environment overrides) and treated as immutable afterwards.

use crate::error::{EducaError, EducaResult};
use crate::logging::LoggingConfig;
use crate::{config_error, ErrorContext};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default lifetime of issued bearer tokens
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Longest accepted token lifetime (one year)
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EducaConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Credential settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC secret used to sign bearer tokens
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    /// Accounts provisioned at startup
    pub seed_users: Vec<SeedUser>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "educa-default-secret-change-in-production".to_string(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
            seed_users: vec![SeedUser {
                email: "demo@demo.com".to_string(),
                password: "1234".to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedUser {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// `sqlite:` URL; in-memory storage when absent
    pub database_url: Option<String>,
}

impl EducaConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> EducaResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EducaError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: EducaConfig = toml::from_str(&content).map_err(|e| EducaError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })?;

        Ok(config)
    }

    /// Apply `EDUCA_*`, `JWT_SECRET` and `DATABASE_URL` overrides
    pub fn apply_env_overrides(&mut self) -> EducaResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> EducaResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("EDUCA_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("EDUCA_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| config_error!(format!("EDUCA_PORT is not a valid port: {port}")))?;
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(ttl) = lookup("EDUCA_TOKEN_TTL_HOURS") {
            self.auth.token_ttl_hours = ttl.parse().map_err(|_| {
                config_error!(format!("EDUCA_TOKEN_TTL_HOURS is not a number: {ttl}"))
            })?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.storage.database_url = Some(url);
        }
        if let Some(level) = lookup("EDUCA_LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> EducaResult<()> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(config_error!("auth.jwt_secret must not be empty"));
        }

        if self.auth.token_ttl_hours <= 0 {
            return Err(config_error!("auth.token_ttl_hours must be greater than 0"));
        }

        if self.auth.token_ttl_hours > MAX_TOKEN_TTL_HOURS {
            return Err(config_error!(format!(
                "auth.token_ttl_hours must be at most {MAX_TOKEN_TTL_HOURS}"
            )));
        }

        if let Some(user) = self
            .auth
            .seed_users
            .iter()
            .find(|u| u.email.trim().is_empty() || u.password.is_empty())
        {
            return Err(config_error!(format!(
                "seed user '{}' needs both an email and a password",
                user.email
            )));
        }

        Ok(())
    }

    /// Socket address the server binds to
    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
