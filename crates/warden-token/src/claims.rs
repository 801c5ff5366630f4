//! # Token Claims
//!
//! The JWT payload and the result of issuing a token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// JWT payload. Timestamps are seconds since the Unix epoch.
///
/// Only the subject identifier travels in the token; no other identity
/// attribute (and never the password digest) is embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the identity id as a decimal string.
    pub sub: String,
    /// Issued-at.
    pub iat: i64,
    /// Expiry.
    pub exp: i64,
}

impl Claims {
    /// Issued-at as a `DateTime`.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    /// Expiry as a `DateTime`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Whether the token is expired at `now` (`now >= exp`).
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// A freshly signed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedToken {
    /// The encoded `header.payload.signature` string.
    pub token: String,
    /// The subject it was issued for.
    pub subject: String,
    /// Issued-at instant.
    pub issued_at: DateTime<Utc>,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
}

impl IssuedToken {
    /// The encoded token.
    pub fn as_str(&self) -> &str {
        &self.token
    }
}
