//! # Token Codec
//!
//! Signs and verifies JWT claims with the configured HMAC algorithm and the
//! secret resolved at call time. Knows nothing about identities.

use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::claims::{Claims, IssuedToken};
use crate::clock::{Clock, SystemClock};
use crate::config::TokenConfig;
use crate::error::TokenError;
use crate::secret::SecretResolver;

/// Stateless signer/verifier. Cheap to clone.
#[derive(Clone)]
pub struct TokenCodec {
    config: Arc<TokenConfig>,
    secret: Arc<dyn SecretResolver>,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Build a codec on the system clock.
    pub fn new(config: Arc<TokenConfig>, secret: Arc<dyn SecretResolver>) -> Self {
        Self {
            config,
            secret,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// Sign a token for `subject`.
    ///
    /// `exp = iat + token_lifetime`. Nothing is persisted.
    pub fn sign(&self, subject: &str) -> Result<IssuedToken, TokenError> {
        let now = self.clock.now();
        let iat = now.timestamp();
        let exp = iat + self.config.token_lifetime().num_seconds();
        let claims = Claims {
            sub: subject.to_string(),
            iat,
            exp,
        };

        let secret = self.secret.resolve()?;
        let header = Header::new(self.config.signature_algorithm());
        let token = encode(&header, &claims, &EncodingKey::from_secret(secret.as_bytes()))
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        let issued_at = claims.issued_at().unwrap_or(now);
        let expires_at = claims
            .expires_at()
            .ok_or_else(|| TokenError::Signing(format!("expiry {exp} out of range")))?;

        Ok(IssuedToken {
            token,
            subject: claims.sub,
            issued_at,
            expires_at,
        })
    }

    /// Verify a token and return its claims.
    ///
    /// Checks structure, then expiry, then algorithm and signature.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let header = decode_header(token).map_err(|e| TokenError::MalformedToken(e.to_string()))?;
        let unverified = self.read_claims(token)?;

        let now = self.clock.now();
        if unverified.is_expired_at(now) {
            return Err(TokenError::Expired {
                expired_at: unverified.expires_at().unwrap_or(now),
            });
        }

        let algorithm = self.config.signature_algorithm();
        if header.alg != algorithm {
            return Err(TokenError::InvalidSignature);
        }

        let secret = self.secret.resolve()?;
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidAlgorithmName
                | ErrorKind::InvalidKeyFormat => TokenError::InvalidSignature,
                _ => TokenError::MalformedToken(e.to_string()),
            })
    }

    /// Parse the payload without checking the signature.
    fn read_claims(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.config.signature_algorithm());
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::MalformedToken(e.to_string()))
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("config", &self.config)
            .field("secret", &"[REDACTED]")
            .field("clock", &self.clock)
            .finish()
    }
}
