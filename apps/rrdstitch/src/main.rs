//! # rrdstitch
//!
//! Appends the full-history series of an rrdtool archive file to a CSV file.
//!
//! ```text
//! rrd file ─▶ rrdtool dump ─▶ temp XML ─▶ rrdstitch-core ─▶ CSV (append)
//! ```
//!
//! ## Usage
//!
//! ```bash
//! rrdstitch traffic/eth0.rrd eth0.csv
//! rrdstitch --json --temp-dir /var/tmp traffic/eth0.rrd eth0.csv
//! RRDSTITCH_LOG_FORMAT=json RUST_LOG=rrdstitch=debug rrdstitch eth0.rrd eth0.csv
//! ```

use clap::Parser;
use rrdstitch::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // RRDSTITCH_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("RRDSTITCH_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rrdstitch=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if let Err(e) = cli::execute(&cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(cli::exit_code(&e));
    }
}
