//! # Incremental CSV Writer
//!
//! Serializes the merged series for appending to an existing output.
//!
//! - A header is written only when there is no prior output
//! - Rows at or before the resume threshold are skipped
//! - Rows with all four metrics `NaN` are skipped
//! - Everything else is written verbatim, one row per line

use crate::primitives::CSV_HEADER;
use crate::{CombinedRow, ResumeState, StitchError};
use csv::{Writer, WriterBuilder};
use serde::Serialize;
use std::io::Write;

/// Row counters of one write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WriteStats {
    /// Rows written to the sink.
    pub written: u64,
    /// Rows at or before the threshold.
    pub skipped_threshold: u64,
    /// Rows with no populated metric.
    pub skipped_empty: u64,
}

/// Streams `CombinedRow`s to a CSV sink.
pub struct IncrementalCsvWriter<W: Write> {
    csv: Writer<W>,
    threshold: Option<i64>,
    header_written: bool,
    stats: WriteStats,
}

impl<W: Write> IncrementalCsvWriter<W> {
    /// Wrap `sink`, writing the header right away for a fresh output.
    pub fn new(sink: W, resume: ResumeState) -> Result<Self, StitchError> {
        let mut csv = WriterBuilder::new().has_headers(false).from_writer(sink);
        let header_written = !resume.has_output();
        if header_written {
            csv.write_record(CSV_HEADER)?;
        }

        Ok(Self {
            csv,
            threshold: resume.threshold(),
            header_written,
            stats: WriteStats::default(),
        })
    }

    /// Write one row unless it is filtered. Returns whether it was written.
    pub fn write_row(&mut self, row: &CombinedRow) -> Result<bool, StitchError> {
        if self
            .threshold
            .is_some_and(|threshold| row.timestamp.epoch <= threshold)
        {
            self.stats.skipped_threshold = self.stats.skipped_threshold.saturating_add(1);
            return Ok(false);
        }
        if row.is_empty() {
            self.stats.skipped_empty = self.stats.skipped_empty.saturating_add(1);
            return Ok(false);
        }

        self.csv.serialize(row.as_record())?;
        self.stats.written = self.stats.written.saturating_add(1);
        Ok(true)
    }

    /// Drain a series into the sink, stopping at its first error.
    pub fn write_series<I>(&mut self, rows: I) -> Result<WriteStats, StitchError>
    where
        I: IntoIterator<Item = Result<CombinedRow, StitchError>>,
    {
        for row in rows {
            self.write_row(&row?)?;
        }
        Ok(self.stats)
    }

    /// Whether this writer emitted the header line.
    #[must_use]
    pub fn header_written(&self) -> bool {
        self.header_written
    }

    /// Counters so far.
    #[must_use]
    pub fn stats(&self) -> WriteStats {
        self.stats
    }

    /// Flush and return the sink.
    pub fn finish(self) -> Result<W, StitchError> {
        self.csv
            .into_inner()
            .map_err(|e| StitchError::Io(e.error().to_string()))
    }
}

// =============================================================================
// TESTS
// =============================================================================
