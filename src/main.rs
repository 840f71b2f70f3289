//! tunesync - cross-platform playlist sync and reconciliation.
//!
//! Matches tracks between music platforms despite noisy, inconsistently
//! formatted metadata, previews an actionable diff, and applies approved
//! matches with idempotent re-runs and clean partial-failure reporting.

pub mod cli;
pub mod config;
pub mod error;
pub mod matching;
pub mod model;
pub mod platform;
pub mod sync;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("tunesync=info".parse().unwrap()))
        .init();

    cli::run_command(&args)
}
