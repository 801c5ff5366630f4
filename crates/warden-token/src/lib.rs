#![deny(missing_docs)]

//! # warden-token: Bearer Token Issuer/Validator
//!
//! Issues HMAC-signed JWTs bound to an [`Identity`](warden_core::Identity)
//! and validates them on later requests.
//!
//! ## Layers
//!
//! - [`TokenCodec`] signs and verifies claims. It knows the configuration,
//!   the secret resolver and the clock, but not the identity store.
//! - [`TokenAuthority`] adds the identity store: `issue(identity)` and
//!   `validate(token) -> identity`.
//!
//! ## Secret resolution
//!
//! The signing secret is never captured at construction. Every sign and
//! verify call asks the injected [`SecretResolver`] for the current secret,
//! so rotating it takes effect on the next request without rebuilding
//! anything.
//!
//! ## Validation order
//!
//! 1. Structure (`MalformedToken`)
//! 2. Expiry, `now >= exp` (`Expired`), regardless of signature
//! 3. Algorithm and signature (`InvalidSignature`)
//! 4. Subject lookup (`IdentityNotFound`)

pub mod authority;
pub mod claims;
pub mod clock;
pub mod codec;
pub mod config;
pub mod error;
pub mod secret;

pub use authority::TokenAuthority;
pub use claims::{Claims, IssuedToken};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::TokenCodec;
pub use config::{ConfigError, NotFoundErrorKind, TokenConfig, MAX_LIFETIME_SECS};
pub use error::{SecretError, TokenError};
pub use jsonwebtoken::Algorithm;
pub use secret::{
    EnvSecret, RotatingSecret, SecretResolver, SigningSecret, StaticSecret, DEFAULT_SECRET_ENV,
};
