//! # Core Type Definitions
//!
//! This module contains the row and archive types shared by every stage of
//! the stitching pipeline:
//! - Timestamps and metric pairs (`Timestamp`, `Metrics`)
//! - Row shapes (`ArchiveRow`, `CombinedRow`)
//! - Archive descriptors (`Consolidation`, `ArchiveDescriptor`)
//! - Error types (`StitchError`)
//!
//! ## Value Guarantees
//!
//! Metric values are carried exactly as parsed. Nothing in the pipeline
//! recomputes, rounds or interpolates them; the only inspection performed is
//! the `NaN` check used to drop unpopulated slots.

use std::fmt;
use thiserror::Error;

// =============================================================================
// TIMESTAMPS
// =============================================================================

/// Timing metadata of one archive slot.
///
/// `epoch` is unix seconds; `date` is the human readable rendering supplied
/// by the dump, kept verbatim for the `DATETIME` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    pub epoch: i64,
    pub date: String,
}

impl Timestamp {
    #[must_use]
    pub fn new(epoch: i64, date: impl Into<String>) -> Self {
        Self {
            epoch,
            date: date.into(),
        }
    }
}

/// Anything carrying an epoch the cascade can order by.
pub trait Timestamped {
    fn epoch(&self) -> i64;
}

// =============================================================================
// METRICS
// =============================================================================

/// The two data source values of one slot: inbound and outbound octets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub in_octets: f64,
    pub out_octets: f64,
}

impl Metrics {
    #[must_use]
    pub const fn new(in_octets: f64, out_octets: f64) -> Self {
        Self {
            in_octets,
            out_octets,
        }
    }

    /// Both slots unpopulated.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.in_octets.is_nan() && self.out_octets.is_nan()
    }
}

// =============================================================================
// ROWS
// =============================================================================

/// One row of a single archive.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveRow {
    pub timestamp: Timestamp,
    pub metrics: Metrics,
}

impl Timestamped for ArchiveRow {
    fn epoch(&self) -> i64 {
        self.timestamp.epoch
    }
}

/// One row of a resolution level: the average archive and the max archive
/// joined on position.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedRow {
    pub timestamp: Timestamp,
    pub avg: Metrics,
    pub max: Metrics,
}

impl CombinedRow {
    #[must_use]
    pub fn new(timestamp: Timestamp, avg: Metrics, max: Metrics) -> Self {
        Self {
            timestamp,
            avg,
            max,
        }
    }

    /// All four metric fields are `NaN`; the slot was never written or has
    /// expired.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.avg.is_unknown() && self.max.is_unknown()
    }

    /// The row as a flat CSV record in header column order.
    #[must_use]
    pub fn as_record(&self) -> (i64, &str, f64, f64, f64, f64) {
        (
            self.timestamp.epoch,
            self.timestamp.date.as_str(),
            self.avg.in_octets,
            self.avg.out_octets,
            self.max.in_octets,
            self.max.out_octets,
        )
    }
}

impl Timestamped for CombinedRow {
    fn epoch(&self) -> i64 {
        self.timestamp.epoch
    }
}

// =============================================================================
// ARCHIVE DESCRIPTORS
// =============================================================================

/// Consolidation function of an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Consolidation {
    Average,
    Max,
    /// Any function the merge does not pair (`MIN`, `LAST`, ...).
    Other(String),
}

impl Consolidation {
    /// Parse the `<cf>` text of an archive.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "AVERAGE" => Self::Average,
            "MAX" => Self::Max,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Consolidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Average => f.write_str("AVERAGE"),
            Self::Max => f.write_str("MAX"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// Per-archive metadata used to validate pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveDescriptor {
    pub consolidation: Consolidation,
    /// Primary data points consolidated into one row; a larger value is a
    /// coarser resolution.
    pub steps_per_row: u64,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while stitching archives.
///
/// Structural problems in the source are fatal and surface unchanged to the
/// caller. A malformed resume state is not an error (see `ResumeState`).
#[derive(Debug, Error)]
pub enum StitchError {
    /// Timing metadata or a data row did not have the expected shape.
    #[error("Malformed archive {index}: {reason}")]
    MalformedArchive { index: usize, reason: String },

    /// The archive blocks cannot be paired into resolution levels.
    #[error("Invalid archive layout: {0}")]
    InvalidLayout(String),

    /// An archive index outside `1..=count` was requested.
    #[error("Archive {index} out of range (archive count {count})")]
    ArchiveOutOfRange { index: usize, count: usize },

    /// The dump could not be parsed as a tree.
    #[error("Tree parse error: {0}")]
    TreeParse(String),

    /// Writing or reading delimited output failed.
    #[error("CSV error: {0}")]
    Csv(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),

    /// The configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The external dump process exited unsuccessfully.
    #[error("Dump failed ({})", exit_description(.status))]
    DumpFailed { status: Option<i32> },
}

impl StitchError {
    pub(crate) fn malformed(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedArchive {
            index,
            reason: reason.into(),
        }
    }
}

fn exit_description(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}

impl From<std::io::Error> for StitchError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<csv::Error> for StitchError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value.to_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================
