//! # Signing Secret Resolution
//!
//! The signing secret is an injected capability, not a value. Every sign
//! and verify call goes through [`SecretResolver::resolve`], so a rotated
//! secret takes effect on the next call.
//!
//! Implementations:
//!
//! | Resolver           | Source                                          |
//! |--------------------|-------------------------------------------------|
//! | [`EnvSecret`]      | Environment variable, re-read on every call     |
//! | [`RotatingSecret`] | Shared in-process cell, replaced via `rotate()` |
//! | [`StaticSecret`]   | Fixed bytes (tests, CLI)                        |
//! | closures           | Any `Fn() -> Result<SigningSecret, SecretError>`|

use std::sync::Arc;

use parking_lot::RwLock;
use zeroize::Zeroizing;

use crate::error::SecretError;

/// Default environment variable for [`EnvSecret`].
pub const DEFAULT_SECRET_ENV: &str = "SECRET_KEY_BASE";

/// Secret key bytes, wiped from memory on drop.
///
/// `Debug` never prints the bytes.
#[derive(Clone)]
pub struct SigningSecret(Zeroizing<Vec<u8>>);

impl SigningSecret {
    /// Wrap secret bytes, rejecting an empty secret.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, SecretError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(SecretError::Empty);
        }
        Ok(Self(Zeroizing::new(bytes)))
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SigningSecret").field(&"[REDACTED]").finish()
    }
}

/// Deferred lookup of the current signing secret.
pub trait SecretResolver: Send + Sync {
    /// Return the secret to use right now.
    fn resolve(&self) -> Result<SigningSecret, SecretError>;
}

impl<F> SecretResolver for F
where
    F: Fn() -> Result<SigningSecret, SecretError> + Send + Sync,
{
    fn resolve(&self) -> Result<SigningSecret, SecretError> {
        self()
    }
}

/// A fixed secret.
#[derive(Debug, Clone)]
pub struct StaticSecret(SigningSecret);

impl StaticSecret {
    /// Use these bytes for every call.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, SecretError> {
        SigningSecret::new(bytes).map(Self)
    }
}

impl SecretResolver for StaticSecret {
    fn resolve(&self) -> Result<SigningSecret, SecretError> {
        Ok(self.0.clone())
    }
}

/// Reads the secret from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvSecret {
    var: String,
}

impl EnvSecret {
    /// Resolve from the named variable.
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// The variable name.
    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Default for EnvSecret {
    fn default() -> Self {
        Self::new(DEFAULT_SECRET_ENV)
    }
}

impl SecretResolver for EnvSecret {
    fn resolve(&self) -> Result<SigningSecret, SecretError> {
        let value = std::env::var(&self.var)
            .map_err(|_| SecretError::Unavailable(format!("environment variable {} is not set", self.var)))?;
        SigningSecret::new(value.into_bytes())
    }
}

/// An in-process secret that can be swapped at runtime.
///
/// Clones share the same cell, so the handle kept by an operator endpoint
/// or signal handler rotates the secret seen by every resolver clone.
#[derive(Debug, Clone)]
pub struct RotatingSecret {
    current: Arc<RwLock<SigningSecret>>,
}

impl RotatingSecret {
    /// Start with the given secret.
    pub fn new(initial: SigningSecret) -> Self {
        Self {
            current: Arc::new(RwLock::new(initial)),
        }
    }

    /// Replace the secret. Tokens signed with the old secret stop verifying.
    pub fn rotate(&self, next: SigningSecret) {
        *self.current.write() = next;
        tracing::info!("signing secret rotated");
    }
}

impl SecretResolver for RotatingSecret {
    fn resolve(&self) -> Result<SigningSecret, SecretError> {
        Ok(self.current.read().clone())
    }
}
