//! # Token Configuration
//!
//! Immutable settings fixed at process start and shared by `Arc`:
//! token lifetime, signature algorithm, and the not-found error kind.
//! The signing secret is deliberately absent; see [`crate::secret`].

use chrono::Duration;
use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable holding the lifetime in seconds.
pub const ENV_LIFETIME_SECS: &str = "TOKEN_LIFETIME_SECS";
/// Environment variable holding the algorithm name (`HS256`, `HS384`, `HS512`).
pub const ENV_ALGORITHM: &str = "TOKEN_SIGNATURE_ALGORITHM";
/// Environment variable holding the not-found kind.
pub const ENV_NOT_FOUND_ERROR: &str = "TOKEN_NOT_FOUND_ERROR";

/// Longest accepted token lifetime, in seconds (ten years).
pub const MAX_LIFETIME_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Invalid configuration values.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Lifetime is not a positive integer number of seconds within bounds.
    #[error("invalid token lifetime {0:?}: expected between 1 and 315360000 seconds")]
    InvalidLifetime(String),

    /// Algorithm is unknown or not a symmetric HMAC algorithm.
    #[error("unsupported signature algorithm {0:?}: expected HS256, HS384 or HS512")]
    UnsupportedAlgorithm(String),

    /// Not-found kind is unknown.
    #[error("unknown not-found error kind {0:?}: expected record_not_found or unauthenticated")]
    UnknownNotFoundKind(String),
}

/// The error kind reported when a token's subject has no identity.
///
/// Carried on [`TokenError::IdentityNotFound`](crate::TokenError::IdentityNotFound)
/// and used as its log code. Clients never see it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotFoundErrorKind {
    /// The subject's record does not exist.
    #[default]
    RecordNotFound,
    /// Treat a missing subject as a plain authentication failure.
    Unauthenticated,
}

impl NotFoundErrorKind {
    /// The snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RecordNotFound => "record_not_found",
            Self::Unauthenticated => "unauthenticated",
        }
    }
}

impl std::fmt::Display for NotFoundErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NotFoundErrorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "record_not_found" => Ok(Self::RecordNotFound),
            "unauthenticated" => Ok(Self::Unauthenticated),
            other => Err(ConfigError::UnknownNotFoundKind(other.to_string())),
        }
    }
}

/// Token issuer/validator settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenConfig {
    token_lifetime: Duration,
    signature_algorithm: Algorithm,
    not_found_error: NotFoundErrorKind,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            token_lifetime: Duration::days(1),
            signature_algorithm: Algorithm::HS256,
            not_found_error: NotFoundErrorKind::RecordNotFound,
        }
    }
}

impl TokenConfig {
    /// Build a configuration, rejecting lifetimes outside
    /// `1..=MAX_LIFETIME_SECS` seconds and non-HMAC algorithms.
    pub fn new(
        token_lifetime: Duration,
        signature_algorithm: Algorithm,
        not_found_error: NotFoundErrorKind,
    ) -> Result<Self, ConfigError> {
        check_lifetime(token_lifetime)?;
        if !is_hmac(signature_algorithm) {
            return Err(ConfigError::UnsupportedAlgorithm(format!(
                "{signature_algorithm:?}"
            )));
        }
        Ok(Self {
            token_lifetime,
            signature_algorithm,
            not_found_error,
        })
    }

    /// Read the configuration from the process environment.
    ///
    /// Unset variables fall back to the defaults (1 day, HS256,
    /// record_not_found).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let token_lifetime = match lookup(ENV_LIFETIME_SECS) {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(lifetime_from_secs)
                .ok_or(ConfigError::InvalidLifetime(raw))?,
            None => defaults.token_lifetime,
        };

        let signature_algorithm = match lookup(ENV_ALGORITHM) {
            Some(raw) => raw
                .trim()
                .parse::<Algorithm>()
                .ok()
                .filter(|alg| is_hmac(*alg))
                .ok_or(ConfigError::UnsupportedAlgorithm(raw))?,
            None => defaults.signature_algorithm,
        };

        let not_found_error = match lookup(ENV_NOT_FOUND_ERROR) {
            Some(raw) => raw.parse()?,
            None => defaults.not_found_error,
        };

        Self::new(token_lifetime, signature_algorithm, not_found_error)
    }

    /// Replace the lifetime.
    pub fn with_lifetime(mut self, lifetime: Duration) -> Result<Self, ConfigError> {
        check_lifetime(lifetime)?;
        self.token_lifetime = lifetime;
        Ok(self)
    }

    /// Replace the lifetime with a count of seconds.
    pub fn with_lifetime_secs(self, secs: i64) -> Result<Self, ConfigError> {
        let lifetime =
            lifetime_from_secs(secs).ok_or_else(|| ConfigError::InvalidLifetime(secs.to_string()))?;
        self.with_lifetime(lifetime)
    }

    /// Duration added to issued-at to compute expiry.
    pub fn token_lifetime(&self) -> Duration {
        self.token_lifetime
    }

    /// The signing algorithm.
    pub fn signature_algorithm(&self) -> Algorithm {
        self.signature_algorithm
    }

    /// The kind reported for unknown subjects.
    pub fn not_found_error(&self) -> NotFoundErrorKind {
        self.not_found_error
    }
}

fn lifetime_from_secs(secs: i64) -> Option<Duration> {
    if (1..=MAX_LIFETIME_SECS).contains(&secs) {
        Duration::try_seconds(secs)
    } else {
        None
    }
}

fn check_lifetime(lifetime: Duration) -> Result<(), ConfigError> {
    if lifetime <= Duration::zero() || lifetime > Duration::seconds(MAX_LIFETIME_SECS) {
        return Err(ConfigError::InvalidLifetime(lifetime.num_seconds().to_string()));
    }
    Ok(())
}

fn is_hmac(alg: Algorithm) -> bool {
    matches!(alg, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)
}
