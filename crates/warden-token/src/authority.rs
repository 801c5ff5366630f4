//! # Token Authority
//!
//! The issuer/validator proper: binds tokens to identities on the way out
//! and resolves them back to identities on the way in.

use std::sync::Arc;

use warden_core::{Identity, IdentityId, IdentityStore};

use crate::claims::IssuedToken;
use crate::codec::TokenCodec;
use crate::error::TokenError;

/// Issues tokens for identities and validates presented tokens.
///
/// Holds no mutable state of its own; concurrent validations only share the
/// resolver and the identity store's read path.
#[derive(Debug, Clone)]
pub struct TokenAuthority {
    codec: TokenCodec,
    identities: Arc<dyn IdentityStore>,
}

impl TokenAuthority {
    /// Combine a codec with the store subjects are resolved against.
    pub fn new(codec: TokenCodec, identities: Arc<dyn IdentityStore>) -> Self {
        Self { codec, identities }
    }

    /// The underlying codec.
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Issue a token whose subject is `identity.id`.
    pub fn issue(&self, identity: &Identity) -> Result<IssuedToken, TokenError> {
        let issued = self.codec.sign(&identity.id.to_string())?;
        tracing::debug!(
            identity_id = %identity.id,
            expires_at = %issued.expires_at,
            "token issued"
        );
        Ok(issued)
    }

    /// Validate a token and resolve its subject to a stored identity.
    pub fn validate(&self, token: &str) -> Result<Identity, TokenError> {
        let claims = self.codec.verify(token)?;
        let kind = self.codec.config().not_found_error();
        let not_found = || TokenError::IdentityNotFound {
            subject: claims.sub.clone(),
            kind,
        };

        let id: IdentityId = claims.sub.parse().map_err(|_| not_found())?;
        self.identities.find_by_id(id).ok_or_else(not_found)
    }
}
