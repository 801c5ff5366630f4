//! # Password Digests
//!
//! Salted bcrypt digests. Plaintext passwords only pass through
//! [`PasswordDigest::hash`] and [`PasswordDigest::verify`]; neither the
//! plaintext nor the digest is ever serialized or logged.

use crate::error::CoreError;

/// Default bcrypt cost factor.
pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

/// Lowest cost bcrypt accepts. Only suitable for tests.
pub const MIN_COST: u32 = 4;

/// Minimum password length in bytes.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length in bytes (bcrypt ignores anything past 72).
pub const MAX_PASSWORD_LENGTH: usize = 72;

/// A bcrypt digest of a password.
///
/// `Debug` is redacted and there is no `Serialize` impl.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Hash a plaintext password with a fresh salt.
    ///
    /// CPU-bound; async callers should run it on a blocking thread.
    pub fn hash(plain: &str, cost: u32) -> Result<Self, CoreError> {
        bcrypt::hash(plain, cost)
            .map(Self)
            .map_err(|e| CoreError::Hashing(e.to_string()))
    }

    /// Accept an existing bcrypt digest (e.g. from a seed file).
    ///
    /// Checks the modular-crypt shape only: `$2?$` prefix, 60 characters.
    pub fn parse(digest: &str) -> Result<Self, CoreError> {
        if digest.len() != 60 || !digest.starts_with("$2") {
            return Err(CoreError::Hashing(
                "not a bcrypt digest (expected 60 characters starting with $2)".into(),
            ));
        }
        Ok(Self(digest.to_string()))
    }

    /// Check a plaintext password against this digest.
    pub fn verify(&self, plain: &str) -> Result<bool, CoreError> {
        bcrypt::verify(plain, &self.0).map_err(|e| CoreError::Hashing(e.to_string()))
    }

    /// The modular-crypt string, for persistence layers.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordDigest([REDACTED])")
    }
}

/// Enforce the password length policy.
pub fn validate_password(plain: &str) -> Result<(), CoreError> {
    if plain.len() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} bytes"
        )));
    }
    if plain.len() > MAX_PASSWORD_LENGTH {
        return Err(CoreError::WeakPassword(format!(
            "password must be at most {MAX_PASSWORD_LENGTH} bytes"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let digest = PasswordDigest::hash("hunter2hunter2", MIN_COST).unwrap();
        assert!(digest.verify("hunter2hunter2").unwrap());
        assert!(!digest.verify("hunter3hunter3").unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = PasswordDigest::hash("same-password", MIN_COST).unwrap();
        let b = PasswordDigest::hash("same-password", MIN_COST).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn debug_is_redacted() {
        let digest = PasswordDigest::hash("hunter2hunter2", MIN_COST).unwrap();
        let rendered = format!("{digest:?}");
        assert!(!rendered.contains("$2"));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn parse_accepts_real_digest() {
        let digest = PasswordDigest::hash("hunter2hunter2", MIN_COST).unwrap();
        let parsed = PasswordDigest::parse(digest.as_str()).unwrap();
        assert!(parsed.verify("hunter2hunter2").unwrap());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(PasswordDigest::parse("plaintext").is_err());
        assert!(PasswordDigest::parse(&"x".repeat(60)).is_err());
    }

    #[test]
    fn password_length_policy() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("long enough").is_ok());
        assert!(validate_password(&"a".repeat(73)).is_err());
        assert!(validate_password(&"a".repeat(72)).is_ok());
    }

    #[test]
    fn length_is_measured_in_bytes() {
        // Four two-byte characters.
        assert!(validate_password("éééé").is_ok());
        let err = validate_password("ééé").unwrap_err();
        assert!(err.to_string().contains("at least 8 bytes"));
        assert!(validate_password(&"é".repeat(37)).is_err());
    }
}
