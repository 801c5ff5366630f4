#![deny(missing_docs)]

//! # warden-core: Identity Model
//!
//! Foundational types shared by every other crate in the workspace: the
//! authenticated principal ([`Identity`]), its validated attributes, the
//! identity store contract, and credential verification.
//!
//! ## Design Principles
//!
//! 1. **Newtypes for domain primitives.** [`IdentityId`] and [`Email`] are
//!    distinct types; an [`Email`] is validated and normalized at construction.
//!
//! 2. **The credential cannot be serialized.** [`PasswordDigest`] and
//!    [`Identity`] have no `Serialize` impl. Response bodies are built from
//!    explicit projections in the API layer.
//!
//! 3. **Stores are collaborators.** [`IdentityStore`] is a trait; the bundled
//!    [`InMemoryIdentityStore`] is one implementation.

pub mod credentials;
pub mod error;
pub mod identity;
pub mod password;
pub mod store;

pub use credentials::{CredentialVerifier, StoreCredentialVerifier};
pub use error::{CoreError, CredentialError, StoreError};
pub use identity::{Email, Identity, IdentityChanges, IdentityId, NewIdentity};
pub use password::{validate_password, PasswordDigest, DEFAULT_COST, MIN_COST};
pub use store::{IdentityStore, InMemoryIdentityStore};
