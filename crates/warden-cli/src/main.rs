//! # warden CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use warden_cli::password::{run_hash_password, HashPasswordArgs};
use warden_cli::token::{effective_config, run_inspect, run_issue, InspectArgs, IssueArgs};
use warden_token::{EnvSecret, TokenCodec, TokenConfig, DEFAULT_SECRET_ENV};

/// warden operator CLI
///
/// Mints and inspects bearer tokens with the same settings as the server,
/// and produces bcrypt digests for identity seed files.
#[derive(Parser, Debug)]
#[command(name = "warden", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Environment variable holding the signing secret.
    #[arg(long, global = true, default_value = DEFAULT_SECRET_ENV)]
    secret_env: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Mint a token for an identity id.
    Issue(IssueArgs),

    /// Verify a token and print its claims.
    Inspect(InspectArgs),

    /// Read a password from stdin and print its bcrypt digest.
    HashPassword(HashPasswordArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = run(cli);

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<u8> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Issue(args) => {
            let config = effective_config(TokenConfig::from_env()?, args.lifetime_secs)?;
            let codec = build_codec(config, &cli.secret_env);
            run_issue(&args, &codec, &mut out)
        }
        Commands::Inspect(args) => {
            let codec = build_codec(TokenConfig::from_env()?, &cli.secret_env);
            run_inspect(&args, &codec, &mut out, &mut std::io::stderr())
        }
        Commands::HashPassword(args) => {
            run_hash_password(&args, &mut std::io::stdin().lock(), &mut out)
        }
    }
}

fn build_codec(config: TokenConfig, secret_env: &str) -> TokenCodec {
    tracing::debug!(secret_env, algorithm = ?config.signature_algorithm(), "building token codec");
    TokenCodec::new(Arc::new(config), Arc::new(EnvSecret::new(secret_env)))
}
