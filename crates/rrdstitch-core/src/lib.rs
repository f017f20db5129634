//! # rrdstitch-core
//!
//! Stitches the archives of a round-robin time-series file into one
//! continuous CSV series that uses the finest resolution available for
//! every moment, and extends that series incrementally on later runs.
//!
//! ## Pipeline
//!
//! ```text
//! dump tree ─▶ source (rows per archive)
//!           ─▶ pairing (AVERAGE + MAX per resolution)
//!           ─▶ cascade (coarsest → finest, one row per epoch)
//!           ─▶ writer (threshold + empty-row filter, CSV)
//! ```
//!
//! ## Constraints
//!
//! - No I/O beyond the `Read`/`Write` handles passed in; running the dump
//!   tool and opening files belong to the binary
//! - Every stage is a lazy, single-pass iterator owning its own cursor
//! - Values are copied, never recomputed

// =============================================================================
// MODULES
// =============================================================================

pub mod cascade;
pub mod formats;
pub mod layout;
pub mod pairing;
pub mod pipeline;
pub mod primitives;
pub mod resume;
pub mod source;
pub mod tree;
pub mod types;
pub mod writer;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{
    ArchiveDescriptor, ArchiveRow, CombinedRow, Consolidation, Metrics, StitchError, Timestamp,
    Timestamped,
};

// =============================================================================
// RE-EXPORTS: Pipeline Stages
// =============================================================================

pub use cascade::CascadeMerge;
pub use formats::RrdXml;
pub use layout::ArchiveLayout;
pub use pairing::PairedRows;
pub use pipeline::{StitchSummary, merged_series, stitch};
pub use resume::ResumeState;
pub use source::{ArchiveRows, Timestamps, Values};
pub use tree::ArchiveTree;
pub use writer::{IncrementalCsvWriter, WriteStats};
