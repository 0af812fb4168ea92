//! Kopi Prima storefront CLI

use std::{io, process};

use tracing::error;

use crate::cli::{commands, config::StorefrontConfig, logging};

mod cli;

/// Kopi Prima CLI entry point
#[tokio::main]
pub async fn main() {
    let config = StorefrontConfig::load().unwrap_or_else(|e| e.exit());

    if let Err(e) = logging::init_subscriber(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, must use eprintln"
        )]
        {
            eprintln!("Logging error: {e}");
        }

        process::exit(1);
    }

    if let Err(e) = commands::run(&config, io::stdout().lock()).await {
        error!(error = %e, "command failed");

        #[expect(
            clippy::print_stderr,
            reason = "the failure is reported to the shopper as well as the log"
        )]
        {
            eprintln!("Error: {e}");
        }

        process::exit(1);
    }
}
