//! # Service Configuration
//!
//! Process-level settings read once at startup from the environment.
//!
//! | Variable                    | Default           | Meaning                                   |
//! |-----------------------------|-------------------|-------------------------------------------|
//! | `PORT`                      | `8080`            | HTTP listen port                          |
//! | `TOKEN_LIFETIME_SECS`       | `86400`           | Token lifetime                            |
//! | `TOKEN_SIGNATURE_ALGORITHM` | `HS256`           | HMAC algorithm                            |
//! | `TOKEN_NOT_FOUND_ERROR`     | `record_not_found`| Log kind for unknown subjects             |
//! | `TOKEN_SECRET_ENV`          | `SECRET_KEY_BASE` | Variable the signing secret is read from  |
//! | `BCRYPT_COST`               | `12`              | Work factor for new password digests      |
//! | `IDENTITY_SEED`             | unset             | YAML file of identities loaded at startup |
//! | `LOG_FORMAT`                | `text`            | `text` or `json`                          |
//!
//! The signing secret itself is never part of this struct. It is re-read
//! through the resolver on every sign and verify.

use std::path::PathBuf;

use thiserror::Error;
use warden_core::{DEFAULT_COST, MIN_COST};
use warden_token::{TokenConfig, DEFAULT_SECRET_ENV};

pub const ENV_PORT: &str = "PORT";
pub const ENV_SECRET_VAR: &str = "TOKEN_SECRET_ENV";
pub const ENV_BCRYPT_COST: &str = "BCRYPT_COST";
pub const ENV_IDENTITY_SEED: &str = "IDENTITY_SEED";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

/// bcrypt rejects costs above 31.
const MAX_COST: u32 = 31;

/// Configuration errors surfaced at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid PORT {0:?}")]
    InvalidPort(String),

    #[error("invalid BCRYPT_COST {0:?}: expected 4..=31")]
    InvalidCost(String),

    #[error("invalid LOG_FORMAT {0:?}: expected text or json")]
    InvalidLogFormat(String),

    #[error(transparent)]
    Token(#[from] warden_token::ConfigError),
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Read `LOG_FORMAT` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        match lookup(ENV_LOG_FORMAT) {
            None => Ok(Self::Text),
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "" | "text" => Ok(Self::Text),
                "json" => Ok(Self::Json),
                _ => Err(ConfigError::InvalidLogFormat(raw)),
            },
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Token lifetime, algorithm and not-found kind.
    pub token: TokenConfig,
    /// Name of the environment variable holding the signing secret.
    pub secret_env: String,
    /// bcrypt work factor for digests created by this process.
    pub bcrypt_cost: u32,
    /// Optional identity seed file.
    pub identity_seed: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            token: TokenConfig::default(),
            secret_env: DEFAULT_SECRET_ENV.to_string(),
            bcrypt_cost: DEFAULT_COST,
            identity_seed: None,
        }
    }
}

impl AppConfig {
    /// Build configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match lookup(ENV_PORT) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => defaults.port,
        };

        let bcrypt_cost = match lookup(ENV_BCRYPT_COST) {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|cost| (MIN_COST..=MAX_COST).contains(cost))
                .ok_or(ConfigError::InvalidCost(raw))?,
            None => defaults.bcrypt_cost,
        };

        let secret_env = lookup(ENV_SECRET_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.secret_env);

        let identity_seed = lookup(ENV_IDENTITY_SEED)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            port,
            token: TokenConfig::from_lookup(&lookup)?,
            secret_env,
            bcrypt_cost,
            identity_seed,
        })
    }
}
