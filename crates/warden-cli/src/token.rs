//! # Token Subcommands
//!
//! `issue` and `inspect`, backed by `warden-token`'s codec.

use std::io::Write;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde_json::json;

use warden_token::{TokenCodec, TokenConfig};

/// Exit code for a token that failed verification.
pub const EXIT_INVALID_TOKEN: u8 = 2;

/// Arguments for `warden issue`.
#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Identity id to bind the token to.
    #[arg(long)]
    pub subject: String,

    /// Override the configured lifetime, in seconds.
    #[arg(long)]
    pub lifetime_secs: Option<i64>,
}

/// Arguments for `warden inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// The encoded token.
    #[arg(value_name = "TOKEN")]
    pub token: String,
}

/// Apply a `--lifetime-secs` override to the configuration.
pub fn effective_config(config: TokenConfig, lifetime_secs: Option<i64>) -> Result<TokenConfig> {
    match lifetime_secs {
        Some(secs) => config
            .with_lifetime_secs(secs)
            .context("invalid --lifetime-secs"),
        None => Ok(config),
    }
}

/// Execute `warden issue`, writing the issued token as JSON.
pub fn run_issue(args: &IssueArgs, codec: &TokenCodec, out: &mut dyn Write) -> Result<u8> {
    let subject = args.subject.trim();
    if subject.is_empty() {
        bail!("--subject must not be empty");
    }

    let issued = codec.sign(subject).context("failed to sign token")?;
    tracing::info!(subject, expires_at = %issued.expires_at, "token issued");

    serde_json::to_writer_pretty(&mut *out, &issued)?;
    writeln!(out)?;
    Ok(0)
}

/// Execute `warden inspect`.
///
/// A valid token prints its claims and exits 0. An invalid one prints the
/// failure code and exits [`EXIT_INVALID_TOKEN`]. Secret faults are errors.
pub fn run_inspect(
    args: &InspectArgs,
    codec: &TokenCodec,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<u8> {
    match codec.verify(args.token.trim()) {
        Ok(claims) => {
            let report = json!({
                "sub": claims.sub,
                "iat": claims.iat,
                "exp": claims.exp,
                "issued_at": claims.issued_at(),
                "expires_at": claims.expires_at(),
            });
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
            Ok(0)
        }
        Err(e) if e.is_authentication_failure() => {
            writeln!(err, "{}: {e}", e.code())?;
            Ok(EXIT_INVALID_TOKEN)
        }
        Err(e) => Err(e).context("token verification failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::sync::Arc;
    use warden_token::{ManualClock, SecretError, SigningSecret, StaticSecret};

    fn codec(secret: &str, clock: &ManualClock) -> TokenCodec {
        TokenCodec::new(
            Arc::new(TokenConfig::default()),
            Arc::new(StaticSecret::new(secret).unwrap()),
        )
        .with_clock(Arc::new(clock.clone()))
    }

    fn issue(codec: &TokenCodec, subject: &str) -> serde_json::Value {
        let mut out = Vec::new();
        let args = IssueArgs {
            subject: subject.into(),
            lifetime_secs: None,
        };
        assert_eq!(run_issue(&args, codec, &mut out).unwrap(), 0);
        serde_json::from_slice(&out).unwrap()
    }

    fn inspect(codec: &TokenCodec, token: &str) -> (u8, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let args = InspectArgs {
            token: token.into(),
        };
        let code = run_inspect(&args, codec, &mut out, &mut err).unwrap();
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn issue_then_inspect() {
        let clock = ManualClock::starting_now();
        let codec = codec("cli-secret", &clock);
        let issued = issue(&codec, "7");
        assert_eq!(issued["subject"], "7");

        let (code, out, _) = inspect(&codec, issued["token"].as_str().unwrap());
        assert_eq!(code, 0);
        let claims: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(claims["sub"], "7");
    }

    #[test]
    fn inspect_reports_expiry_code() {
        let clock = ManualClock::starting_now();
        let codec = codec("cli-secret", &clock);
        let issued = issue(&codec, "7");
        clock.advance(Duration::days(2));

        let (code, out, err) = inspect(&codec, issued["token"].as_str().unwrap());
        assert_eq!(code, EXIT_INVALID_TOKEN);
        assert!(out.is_empty());
        assert!(err.starts_with("expired:"));
    }

    #[test]
    fn inspect_reports_wrong_secret() {
        let clock = ManualClock::starting_now();
        let issued = issue(&codec("one", &clock), "7");
        let (code, _, err) = inspect(&codec("two", &clock), issued["token"].as_str().unwrap());
        assert_eq!(code, EXIT_INVALID_TOKEN);
        assert!(err.starts_with("invalid_signature:"));
    }

    #[test]
    fn empty_subject_rejected() {
        let clock = ManualClock::starting_now();
        let args = IssueArgs {
            subject: "  ".into(),
            lifetime_secs: None,
        };
        assert!(run_issue(&args, &codec("s", &clock), &mut Vec::new()).is_err());
    }

    #[test]
    fn lifetime_override() {
        let config = effective_config(TokenConfig::default(), Some(60)).unwrap();
        assert_eq!(config.token_lifetime(), Duration::seconds(60));
        assert!(effective_config(TokenConfig::default(), Some(0)).is_err());
    }

    #[test]
    fn oversized_lifetime_rejected() {
        for secs in [i64::MAX, 9_223_372_036_854_776, 9_000_000_000_000] {
            assert!(effective_config(TokenConfig::default(), Some(secs)).is_err());
        }
    }

    #[test]
    fn secret_fault_is_an_error() {
        let issued = issue(&codec("s", &ManualClock::starting_now()), "1");
        let failing = || -> Result<SigningSecret, SecretError> { Err(SecretError::Empty) };
        let broken = TokenCodec::new(Arc::new(TokenConfig::default()), Arc::new(failing));
        let args = InspectArgs {
            token: issued["token"].as_str().unwrap().into(),
        };
        assert!(run_inspect(&args, &broken, &mut Vec::new(), &mut Vec::new()).is_err());
    }
}
