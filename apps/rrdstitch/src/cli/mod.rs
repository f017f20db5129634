//! # rrdstitch CLI Module
//!
//! One invocation stitches one archive file into one CSV file:
//!
//! ```text
//! rrdstitch [OPTIONS] <RRD_FILE> <CSV_FILE>
//! ```

mod commands;

use clap::Parser;
use rrdstitch_core::{StitchError, StitchSummary};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// rrdstitch - merge every resolution of an rrdtool archive into one series
///
/// Dumps RRD_FILE, merges its AVERAGE/MAX archives from coarsest to finest
/// and appends the rows newer than the last line of CSV_FILE.
#[derive(Parser, Debug)]
#[command(name = "rrdstitch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Archive file to dump
    pub rrd_file: PathBuf,

    /// CSV file to create or extend
    pub csv_file: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// rrdtool binary used for the dump
    #[arg(long, env = "RRDSTITCH_RRDTOOL")]
    pub rrdtool: Option<PathBuf>,

    /// Directory for the temporary XML dump
    #[arg(long)]
    pub temp_dir: Option<PathBuf>,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Suppress the run summary
    #[arg(short, long)]
    pub quiet: bool,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: &Cli) -> Result<StitchSummary, StitchError> {
    let config = crate::config::Config::resolve(
        cli.config.as_deref(),
        cli.rrdtool.clone(),
        cli.temp_dir.clone(),
    )?;
    let summary = cmd_stitch(&config, &cli.rrd_file, &cli.csv_file)?;

    if !cli.quiet {
        print_summary(&summary, &cli.csv_file, cli.json);
    }
    Ok(summary)
}

/// Process exit code for a failed run: the dump's own status when it
/// reported one, 1 otherwise.
#[must_use]
pub fn exit_code(error: &StitchError) -> i32 {
    match error {
        StitchError::DumpFailed { status: Some(code) } => *code,
        _ => 1,
    }
}

// =============================================================================
// TESTS
// =============================================================================
