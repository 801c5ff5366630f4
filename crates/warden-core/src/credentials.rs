//! # Credential Verification
//!
//! The contract for turning credentials into an [`Identity`]: "accepts
//! credentials, returns an identity or fails". The token issuer never sees
//! passwords; it is handed the identity this returns.

use std::sync::Arc;

use crate::error::CredentialError;
use crate::identity::{Email, Identity};
use crate::store::IdentityStore;

/// Checks email/password credentials.
pub trait CredentialVerifier: Send + Sync + std::fmt::Debug {
    /// Resolve the identity owning these credentials.
    ///
    /// CPU-bound for bcrypt-backed implementations.
    fn verify(&self, email: &str, password: &str) -> Result<Identity, CredentialError>;
}

/// Verifies credentials against an [`IdentityStore`] and its bcrypt digests.
#[derive(Debug, Clone)]
pub struct StoreCredentialVerifier {
    store: Arc<dyn IdentityStore>,
}

impl StoreCredentialVerifier {
    /// Verify against the given store.
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }
}

impl CredentialVerifier for StoreCredentialVerifier {
    fn verify(&self, email: &str, password: &str) -> Result<Identity, CredentialError> {
        let email = Email::parse(email).map_err(|_| CredentialError::InvalidCredentials)?;
        let identity = self
            .store
            .find_by_email(&email)
            .ok_or(CredentialError::InvalidCredentials)?;
        let matches = identity
            .password_digest
            .verify(password)
            .map_err(|e| CredentialError::Hashing(e.to_string()))?;
        if matches {
            Ok(identity)
        } else {
            Err(CredentialError::InvalidCredentials)
        }
    }
}
