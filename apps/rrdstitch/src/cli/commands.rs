//! # CLI Command Implementations
//!
//! The stitch run: dump, parse, read the resume point, merge and append.

use crate::config::Config;
use crate::dump::DumpArtifact;
use rrdstitch_core::{ResumeState, RrdXml, StitchError, StitchSummary, stitch};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::Path;

// =============================================================================
// STITCH COMMAND
// =============================================================================

/// Stitch `rrd_file` into `csv_file`.
///
/// The dump runs before the CSV file is opened, so a failed dump leaves the
/// output untouched. The temporary XML file is removed on every path.
pub fn cmd_stitch(
    config: &Config,
    rrd_file: &Path,
    csv_file: &Path,
) -> Result<StitchSummary, StitchError> {
    tracing::info!(
        rrd = %rrd_file.display(),
        csv = %csv_file.display(),
        "stitching archive"
    );

    let dump = DumpArtifact::create(&config.rrdtool, rrd_file, config.temp_dir.as_deref())?;
    let xml = dump.read_to_string()?;
    let tree = RrdXml::parse(&xml)?;

    let output = open_output(csv_file)?;
    let resume = ResumeState::from_reader(BufReader::new(&output))?;
    tracing::info!(
        has_output = resume.has_output(),
        threshold = ?resume.threshold(),
        "resume point"
    );

    let (mut sink, summary) = stitch(&tree, &output, resume)?;
    sink.flush()?;

    tracing::info!(
        resolutions = summary.resolutions,
        steps_per_row = ?summary.steps_per_row,
        "archive layout"
    );
    tracing::info!(
        written = summary.stats.written,
        skipped_threshold = summary.stats.skipped_threshold,
        skipped_empty = summary.stats.skipped_empty,
        "stitch complete"
    );

    Ok(summary)
}

/// Open the CSV file for reading the resume point and appending rows,
/// creating it if missing.
fn open_output(csv_file: &Path) -> Result<File, StitchError> {
    OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(csv_file)
        .map_err(|e| StitchError::Io(format!("cannot open '{}': {e}", csv_file.display())))
}

// =============================================================================
// SUMMARY OUTPUT
// =============================================================================

/// Print the run summary to stdout.
pub fn print_summary(summary: &StitchSummary, csv_file: &Path, json_mode: bool) {
    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(summary).unwrap_or_default()
        );
        return;
    }

    println!("rrdstitch Summary");
    println!("=================");
    println!("Output:       {}", csv_file.display());
    println!("Resolutions:  {}", summary.resolutions);
    println!("Steps/row:    {:?}", summary.steps_per_row);
    match summary.threshold {
        Some(epoch) => println!("Resumed at:   {epoch}"),
        None => println!("Resumed at:   -"),
    }
    println!("Header:       {}", summary.header_written);
    println!();
    println!("Written:      {}", summary.stats.written);
    println!("Already had:  {}", summary.stats.skipped_threshold);
    println!("Empty:        {}", summary.stats.skipped_empty);
}
