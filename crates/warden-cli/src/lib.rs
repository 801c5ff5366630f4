//! # warden-cli: Operator Tooling
//!
//! Provides the `warden` command-line interface.
//!
//! ## Subcommands
//!
//! - `warden issue --subject <id>`: mint a token with the configured secret.
//! - `warden inspect <token>`: verify a token and print its claims.
//! - `warden hash-password`: read a password on stdin and print its bcrypt
//!   digest, for `password_digest` entries in identity seed files.
//!
//! Token settings come from the same environment variables the server
//! reads (`TOKEN_LIFETIME_SECS`, `TOKEN_SIGNATURE_ALGORITHM`), and the
//! secret from the variable named by `--secret-env`.
//!
//! ```bash
//! SECRET_KEY_BASE=... warden issue --subject 1 --lifetime-secs 300
//! SECRET_KEY_BASE=... warden inspect eyJhbGciOi...
//! echo 'correct-horse-battery' | warden hash-password --cost 12
//! ```

pub mod password;
pub mod token;
