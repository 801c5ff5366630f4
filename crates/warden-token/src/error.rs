//! # Token Errors
//!
//! Every failure is distinguishable here for logging. The API boundary
//! collapses the authentication failures into one client-visible response.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::config::NotFoundErrorKind;

/// Failures while resolving the signing secret.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecretError {
    /// The backing source (e.g. environment variable) is not set.
    #[error("signing secret unavailable: {0}")]
    Unavailable(String),

    /// The source resolved to an empty secret.
    #[error("signing secret is empty")]
    Empty,
}

/// Token issue/validate failures.
#[derive(Error, Debug)]
pub enum TokenError {
    /// No bearer token was presented.
    #[error("missing bearer token")]
    MissingToken,

    /// The token (or authorization header) could not be parsed.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// Signature verification failed, or the header names another algorithm.
    #[error("invalid token signature")]
    InvalidSignature,

    /// The current time is at or past the token's expiry.
    #[error("token expired at {expired_at}")]
    Expired {
        /// The token's `exp` instant.
        expired_at: DateTime<Utc>,
    },

    /// The subject does not resolve to a stored identity.
    #[error("identity not found for subject {subject:?} ({kind})")]
    IdentityNotFound {
        /// The raw `sub` claim.
        subject: String,
        /// The configured not-found kind.
        kind: NotFoundErrorKind,
    },

    /// The signing secret could not be resolved.
    #[error(transparent)]
    Secret(#[from] SecretError),

    /// Encoding a token failed.
    #[error("token signing failed: {0}")]
    Signing(String),
}

impl TokenError {
    /// Stable snake_case label for logs and metrics.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingToken => "missing_token",
            Self::MalformedToken(_) => "malformed_token",
            Self::InvalidSignature => "invalid_signature",
            Self::Expired { .. } => "expired",
            Self::IdentityNotFound { kind, .. } => kind.as_str(),
            Self::Secret(_) => "secret_unavailable",
            Self::Signing(_) => "signing_failed",
        }
    }

    /// True for failures caused by what the client presented.
    ///
    /// Secret and signing failures are server faults.
    pub fn is_authentication_failure(&self) -> bool {
        !matches!(self, Self::Secret(_) | Self::Signing(_))
    }
}
