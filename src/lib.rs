// Kutty - voice command interpreter for browser control

// Enable coverage attribute on nightly for explicit exclusions
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod browser;
pub mod cli;
pub mod events;
pub mod listening;
pub mod processing;
pub mod settings;
pub mod site_actions;
pub mod voice_commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

// Re-export log macros for use throughout the crate
pub use log::{debug, error, info, trace, warn};

/// Install the log subscriber; `RUST_LOG` overrides the default level
#[cfg_attr(coverage_nightly, coverage(off))]
fn init_logging(verbose: bool) {
    let level = if verbose || cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

/// Application entry point - parses arguments and drives the console host.
/// Note: This function cannot be unit tested as it reads stdin until EOF.
#[cfg_attr(coverage_nightly, coverage(off))]
pub fn run() -> Result<(), cli::CliError> {
    let args = cli::Cli::parse();
    init_logging(args.verbose);

    info!("Starting kutty...");
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(cli::run_cli(args))
}
