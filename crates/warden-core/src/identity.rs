//! # Identity Types
//!
//! The authenticated principal and its attributes.
//!
//! ## Validation
//!
//! [`Email`] validates and normalizes at construction (trimmed, lowercased,
//! exactly one `@`, non-empty local part and domain, no whitespace).
//! [`IdentityId`] is always valid by construction.
//!
//! ## Serialization
//!
//! [`IdentityId`] and [`Email`] serialize transparently. [`Identity`] does
//! not implement `Serialize` at all: it owns a [`PasswordDigest`], and the
//! only way to put an identity on the wire is an explicit projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::password::PasswordDigest;

// ---------------------------------------------------------------------------
// IdentityId
// ---------------------------------------------------------------------------

/// Unique identifier of an [`Identity`].
///
/// Encoded as its decimal string when used as a token subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityId(u64);

impl IdentityId {
    /// Wrap a raw identifier.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw identifier.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for IdentityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for IdentityId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self)
    }
}

// ---------------------------------------------------------------------------
// Email
// ---------------------------------------------------------------------------

/// A validated, normalized email address.
///
/// Two addresses differing only in case or surrounding whitespace compare
/// equal, which is what the store's uniqueness check relies on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Parse and normalize an email address.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidEmail`] if the input is not `local@domain`.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        let normalized = value.trim().to_lowercase();
        let mut parts = normalized.split('@');
        let valid = match (parts.next(), parts.next(), parts.next()) {
            (Some(local), Some(domain), None) => {
                !local.is_empty()
                    && !domain.is_empty()
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !normalized.chars().any(char::is_whitespace)
            }
            _ => false,
        };
        if !valid {
            return Err(CoreError::InvalidEmail(value.to_string()));
        }
        Ok(Self(normalized))
    }

    /// Access the normalized address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Email {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Email::parse(&raw).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// The authenticated principal.
///
/// Created by a registration flow or seed file, read on every guarded
/// request, mutated only through [`IdentityStore::update`](crate::IdentityStore::update).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Store-assigned identifier.
    pub id: IdentityId,
    /// Display name.
    pub name: String,
    /// Unique (per store) email address.
    pub email: Email,
    /// Salted bcrypt digest of the password.
    pub password_digest: PasswordDigest,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last modification instant.
    pub updated_at: DateTime<Utc>,
}

/// Attributes for a not-yet-stored identity.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: Email,
    /// Password digest.
    pub password_digest: PasswordDigest,
}

impl NewIdentity {
    /// Build a new identity record, rejecting blank names.
    pub fn new(
        name: impl Into<String>,
        email: Email,
        password_digest: PasswordDigest,
    ) -> Result<Self, CoreError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::EmptyName);
        }
        Ok(Self {
            name,
            email,
            password_digest,
        })
    }
}

/// A partial update. `None` leaves the attribute untouched.
#[derive(Debug, Clone, Default)]
pub struct IdentityChanges {
    /// New display name.
    pub name: Option<String>,
    /// New email address.
    pub email: Option<Email>,
    /// New password digest.
    pub password_digest: Option<PasswordDigest>,
}

impl IdentityChanges {
    /// True when no attribute would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password_digest.is_none()
    }
}
