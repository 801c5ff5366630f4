//! # Service Bootstrap
//!
//! Builds [`AppState`] from [`AppConfig`] at startup.
//!
//! ## Bootstrap Sequence
//!
//! 1. **Build State**: in-memory identity store, env-backed secret resolver.
//! 2. **Load Identity Seed**: if `IDENTITY_SEED` is set, parse the YAML file
//!    and create every listed identity.
//! 3. **Probe Secret**: resolve the secret once and warn if it is missing.
//!    The server still starts; requests fail with 500 until it is set.
//! 4. **Log Banner**: structured startup summary.
//!
//! Seed file shape:
//!
//! ```yaml
//! identities:
//!   - name: Alice
//!     email: alice@example.com
//!     password: correct-horse-battery
//!   - name: Bob
//!     email: bob@example.com
//!     password_digest: "$2b$12$..."
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use warden_core::{Email, IdentityStore, NewIdentity, PasswordDigest, StoreError};
use warden_token::SecretResolver;

use crate::config::AppConfig;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors during bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// Seed file could not be read.
    #[error("cannot read identity seed {path}: {source}")]
    SeedUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Seed file is not valid YAML of the expected shape.
    #[error("invalid identity seed: {0}")]
    SeedFormat(#[from] serde_yaml::Error),

    /// One seed entry failed validation.
    #[error("identity seed entry {index}: {reason}")]
    InvalidEntry { index: usize, reason: String },

    /// The store rejected a seed entry.
    #[error("identity seed entry {index}: {source}")]
    Store {
        index: usize,
        #[source]
        source: StoreError,
    },
}

// ---------------------------------------------------------------------------
// Seed file types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    identities: Vec<SeedIdentity>,
}

#[derive(Deserialize)]
struct SeedIdentity {
    name: String,
    email: String,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    password_digest: Option<String>,
}

impl std::fmt::Debug for SeedIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedIdentity")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("password_digest", &self.password_digest.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Build application state from configuration.
pub fn bootstrap(config: AppConfig) -> Result<AppState, BootstrapError> {
    let seed = config.identity_seed.clone();
    let cost = config.bcrypt_cost;
    let state = AppState::new(config);

    let seeded = match &seed {
        Some(path) => load_seed(path, state.identities.as_ref(), cost)?,
        None => 0,
    };

    probe_secret(&state);
    log_banner(&state, seeded);
    Ok(state)
}

/// Read a seed file and create its identities. Returns how many were created.
pub fn load_seed(
    path: &Path,
    store: &dyn IdentityStore,
    cost: u32,
) -> Result<usize, BootstrapError> {
    let raw = std::fs::read_to_string(path).map_err(|source| BootstrapError::SeedUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let count = seed_from_str(&raw, store, cost)?;
    tracing::info!(path = %path.display(), count, "identity seed loaded");
    Ok(count)
}

/// Parse seed YAML and create its identities.
///
/// Entries are created in file order and the first failure stops the load.
pub fn seed_from_str(
    yaml: &str,
    store: &dyn IdentityStore,
    cost: u32,
) -> Result<usize, BootstrapError> {
    let seed: SeedFile = serde_yaml::from_str(yaml)?;
    let mut created_count = 0;

    for (index, entry) in seed.identities.into_iter().enumerate() {
        let new = to_new_identity(entry, cost)
            .map_err(|reason| BootstrapError::InvalidEntry { index, reason })?;
        let created = store
            .create(new)
            .map_err(|source| BootstrapError::Store { index, source })?;
        tracing::debug!(identity_id = %created.id, email = %created.email, "seeded identity");
        created_count += 1;
    }
    Ok(created_count)
}

fn to_new_identity(entry: SeedIdentity, cost: u32) -> Result<NewIdentity, String> {
    let email = Email::parse(&entry.email).map_err(|e| e.to_string())?;
    let digest = match (entry.password, entry.password_digest) {
        (Some(password), None) => {
            warden_core::validate_password(&password).map_err(|e| e.to_string())?;
            PasswordDigest::hash(&password, cost).map_err(|e| e.to_string())?
        }
        (None, Some(digest)) => PasswordDigest::parse(&digest).map_err(|e| e.to_string())?,
        _ => return Err("exactly one of password or password_digest is required".to_string()),
    };
    NewIdentity::new(entry.name, email, digest).map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// Startup checks and banner
// ---------------------------------------------------------------------------

fn probe_secret(state: &AppState) {
    let resolver = warden_token::EnvSecret::new(state.config.secret_env.clone());
    if let Err(e) = resolver.resolve() {
        tracing::warn!(
            variable = %state.config.secret_env,
            error = %e,
            "signing secret not available; token operations will fail until it is set"
        );
    }
}

fn log_banner(state: &AppState, seeded: usize) {
    let token = &state.config.token;
    tracing::info!(
        port = state.config.port,
        algorithm = ?token.signature_algorithm(),
        lifetime_secs = token.token_lifetime().num_seconds(),
        not_found_error = %token.not_found_error(),
        secret_env = %state.config.secret_env,
        identities = seeded,
        "warden bootstrap complete"
    );
}
