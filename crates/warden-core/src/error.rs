//! # Error Hierarchy
//!
//! Structured error types for the identity model, built with `thiserror`.

use thiserror::Error;

use crate::identity::{Email, IdentityId};

/// Validation and hashing failures for identity attributes.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Email does not look like `local@domain`.
    #[error("invalid email address: \"{0}\"")]
    InvalidEmail(String),

    /// Password fails the length policy.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// Name is empty after trimming.
    #[error("name must not be empty")]
    EmptyName,

    /// The bcrypt backend failed.
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Identity store failures.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// No identity with the given id.
    #[error("identity {0} not found")]
    NotFound(IdentityId),

    /// Another identity already owns this email.
    #[error("email {0} is already taken")]
    DuplicateEmail(Email),
}

/// Credential verification failures.
///
/// Unknown email and wrong password collapse into one variant so callers
/// cannot distinguish them.
#[derive(Error, Debug)]
pub enum CredentialError {
    /// Email unknown or password mismatch.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The bcrypt backend failed.
    #[error("password verification failed: {0}")]
    Hashing(String),
}
