//! `mprofile`: look up mParticle profiles from the command line.
//!
//! Credentials come from the `mp_*` environment variables (see
//! `mprofile_sdk::config`). Results are printed to stdout as JSON; logs go
//! to stderr and are controlled via `RUST_LOG`.

use anyhow::Result;
use clap::Parser;

mod args;
mod commands;

use crate::args::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Structured logging on stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let endpoints = cli.endpoints();

    match cli.command {
        Command::Lookup(args) => commands::lookup(endpoints, args).await,
        Command::Resolve(args) => commands::resolve(endpoints, args).await,
        Command::Fetch(args) => commands::fetch(endpoints, args).await,
        Command::Token => commands::token(endpoints).await,
    }
}
