//! # Stitch Pipeline
//!
//! Wires the stages together for one run:
//!
//! ```text
//! ArchiveTree ─▶ ArchiveLayout (validate)
//!             ─▶ PairedRows per resolution (coarsest first)
//!             ─▶ CascadeMerge
//!             ─▶ IncrementalCsvWriter ─▶ sink
//! ```
//!
//! Rows are pulled one at a time from the tree to the sink; the merged
//! series is never collected.

use crate::cascade::CascadeMerge;
use crate::layout::ArchiveLayout;
use crate::pairing::PairedRows;
use crate::tree::ArchiveTree;
use crate::writer::{IncrementalCsvWriter, WriteStats};
use crate::{CombinedRow, ResumeState, StitchError};
use serde::Serialize;
use std::io::Write;

/// Outcome of one stitch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StitchSummary {
    /// Resolution levels merged.
    pub resolutions: usize,
    /// `steps_per_row` of each level, finest first.
    pub steps_per_row: Vec<u64>,
    /// Epoch threshold applied, if any.
    pub threshold: Option<i64>,
    pub header_written: bool,
    #[serde(flatten)]
    pub stats: WriteStats,
}

/// The merged series of every resolution level in `tree`.
pub fn merged_series<'t, T: ArchiveTree + ?Sized>(
    tree: &'t T,
    layout: &ArchiveLayout,
) -> Result<CascadeMerge<PairedRows<'t>, CombinedRow>, StitchError> {
    let resolutions = layout.resolutions();
    let levels = layout
        .merge_order()
        .map(|resolution| PairedRows::open(tree, resolution, resolutions))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CascadeMerge::new(levels))
}

/// Validate `tree`, merge it and append the result to `sink`.
///
/// The sink is flushed and handed back on success. On error, rows written
/// before the failure may already be in the sink.
pub fn stitch<T, W>(
    tree: &T,
    sink: W,
    resume: ResumeState,
) -> Result<(W, StitchSummary), StitchError>
where
    T: ArchiveTree + ?Sized,
    W: Write,
{
    let layout = ArchiveLayout::from_tree(tree)?;
    let series = merged_series(tree, &layout)?;

    let mut writer = IncrementalCsvWriter::new(sink, resume)?;
    let stats = writer.write_series(series)?;
    let header_written = writer.header_written();
    let sink = writer.finish()?;

    Ok((
        sink,
        StitchSummary {
            resolutions: layout.resolutions(),
            steps_per_row: layout.steps_per_row().to_vec(),
            threshold: resume.threshold(),
            header_written,
            stats,
        },
    ))
}

// =============================================================================
// TESTS
// =============================================================================
