//! # Application State
//!
//! Shared handles passed to every handler through `State<AppState>`.
//! Everything is behind `Arc`, so cloning per request is cheap.

use std::sync::Arc;

use warden_core::{CredentialVerifier, IdentityStore, InMemoryIdentityStore, StoreCredentialVerifier};
use warden_token::{Clock, EnvSecret, SecretResolver, SystemClock, TokenAuthority, TokenCodec};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub identities: Arc<dyn IdentityStore>,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub tokens: TokenAuthority,
}

impl AppState {
    /// State with an empty in-memory store and the secret read from the
    /// variable named by `config.secret_env`.
    pub fn new(config: AppConfig) -> Self {
        let secret = Arc::new(EnvSecret::new(config.secret_env.clone()));
        Self::with_parts(
            config,
            Arc::new(InMemoryIdentityStore::new()),
            secret,
            Arc::new(SystemClock),
        )
    }

    /// Assemble state from explicit collaborators.
    pub fn with_parts(
        config: AppConfig,
        identities: Arc<dyn IdentityStore>,
        secret: Arc<dyn SecretResolver>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let codec = TokenCodec::new(Arc::new(config.token.clone()), secret).with_clock(clock);
        let tokens = TokenAuthority::new(codec, identities.clone());
        let credentials = Arc::new(StoreCredentialVerifier::new(identities.clone()));
        Self {
            config: Arc::new(config),
            identities,
            credentials,
            tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_token::StaticSecret;

    #[test]
    fn clones_share_the_store() {
        let store = Arc::new(InMemoryIdentityStore::new());
        let state = AppState::with_parts(
            AppConfig::default(),
            store.clone(),
            Arc::new(StaticSecret::new("s").unwrap()),
            Arc::new(SystemClock),
        );
        let clone = state.clone();
        assert!(Arc::ptr_eq(&state.identities, &clone.identities));
        assert!(clone.identities.list().is_empty());
    }

    #[test]
    fn new_reads_secret_from_configured_variable() {
        let config = AppConfig {
            secret_env: "WARDEN_STATE_TEST_UNSET_SECRET".into(),
            ..AppConfig::default()
        };
        let state = AppState::new(config);
        let err = state.tokens.codec().sign("1").unwrap_err();
        assert!(!err.is_authentication_failure());
    }
}
