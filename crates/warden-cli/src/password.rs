//! # Password Digest Subcommand
//!
//! Reads a single password line and prints its bcrypt digest.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::Args;

use warden_core::{validate_password, PasswordDigest, DEFAULT_COST, MIN_COST};

/// Arguments for `warden hash-password`.
#[derive(Args, Debug)]
pub struct HashPasswordArgs {
    /// bcrypt work factor.
    #[arg(long, default_value_t = DEFAULT_COST)]
    pub cost: u32,
}

/// Execute `warden hash-password`.
pub fn run_hash_password(
    args: &HashPasswordArgs,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<u8> {
    if !(MIN_COST..=31).contains(&args.cost) {
        bail!("--cost must be between {MIN_COST} and 31");
    }

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']);

    validate_password(password)?;
    let digest = PasswordDigest::hash(password, args.cost)?;
    writeln!(out, "{}", digest.as_str())?;
    Ok(0)
}
