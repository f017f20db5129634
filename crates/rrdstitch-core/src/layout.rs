//! # Archive Layout
//!
//! Validates that the archive blocks of a dump can be paired into
//! resolution levels before any row is read.
//!
//! Required block order for `2 * R` archives:
//! - archives `1..=R` consolidate with `AVERAGE`
//! - archives `R+1..=2R` consolidate with `MAX`
//! - archive `i` and archive `i + R` share `steps_per_row`
//! - `steps_per_row` never decreases from archive `1` to archive `R`

use crate::primitives::CONSOLIDATION_FAMILIES;
use crate::tree::ArchiveTree;
use crate::{Consolidation, StitchError};
use std::iter::Rev;
use std::ops::RangeInclusive;

/// The validated resolution levels of a dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveLayout {
    /// `steps_per_row` of each level, finest first.
    steps_per_row: Vec<u64>,
}

impl ArchiveLayout {
    /// Read and validate the descriptors of every archive in `tree`.
    pub fn from_tree<T: ArchiveTree + ?Sized>(tree: &T) -> Result<Self, StitchError> {
        let count = tree.archive_count();
        if count % CONSOLIDATION_FAMILIES != 0 {
            return Err(StitchError::InvalidLayout(format!(
                "{count} archives cannot be split into AVERAGE and MAX families"
            )));
        }
        let resolutions = count / CONSOLIDATION_FAMILIES;

        let mut steps_per_row = Vec::with_capacity(resolutions);
        for index in 1..=resolutions {
            let avg = tree.descriptor(index)?;
            let max = tree.descriptor(index + resolutions)?;

            if avg.consolidation != Consolidation::Average {
                return Err(StitchError::InvalidLayout(format!(
                    "archive {index} consolidates with {}, expected AVERAGE",
                    avg.consolidation
                )));
            }
            if max.consolidation != Consolidation::Max {
                return Err(StitchError::InvalidLayout(format!(
                    "archive {} consolidates with {}, expected MAX",
                    index + resolutions,
                    max.consolidation
                )));
            }
            if avg.steps_per_row != max.steps_per_row {
                return Err(StitchError::InvalidLayout(format!(
                    "archive {index} ({} steps per row) and archive {} ({} steps per row) differ in resolution",
                    avg.steps_per_row,
                    index + resolutions,
                    max.steps_per_row
                )));
            }
            if let Some(&finer) = steps_per_row.last() {
                if avg.steps_per_row < finer {
                    return Err(StitchError::InvalidLayout(format!(
                        "archive {index} ({} steps per row) is finer than the archive before it ({finer} steps per row)",
                        avg.steps_per_row
                    )));
                }
            }
            steps_per_row.push(avg.steps_per_row);
        }

        Ok(Self { steps_per_row })
    }

    /// Number of resolution levels.
    #[must_use]
    pub fn resolutions(&self) -> usize {
        self.steps_per_row.len()
    }

    /// `steps_per_row` of each level, finest first.
    #[must_use]
    pub fn steps_per_row(&self) -> &[u64] {
        &self.steps_per_row
    }

    /// Resolution indices in merge order: coarsest first.
    pub fn merge_order(&self) -> Rev<RangeInclusive<usize>> {
        (1..=self.resolutions()).rev()
    }
}

// =============================================================================
// TESTS
// =============================================================================
