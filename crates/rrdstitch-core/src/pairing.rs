//! # Archive Pairing
//!
//! Joins the average archive and the max archive of one resolution level.
//!
//! A dump holding `2 * R` archives stores `R` average archives (finest
//! first) followed by `R` max archives in the same order, so resolution `i`
//! is archive `i` paired with archive `i + R`. Both archives of a pair share
//! step and alignment, so rows are joined by position and only the average
//! archive's timing comments are read.

use crate::source::{Timestamps, Values};
use crate::tree::ArchiveTree;
use crate::{CombinedRow, StitchError};

/// Combined rows of one resolution level.
///
/// Ends with the shortest of its three inputs.
pub struct PairedRows<'t> {
    resolution: usize,
    timestamps: Timestamps<'t>,
    avg: Values<'t>,
    max: Values<'t>,
}

impl<'t> PairedRows<'t> {
    /// Open resolution `resolution` (1-based, finest first) of a tree holding
    /// `resolutions` levels.
    pub fn open<T: ArchiveTree + ?Sized>(
        tree: &'t T,
        resolution: usize,
        resolutions: usize,
    ) -> Result<Self, StitchError> {
        if resolution == 0 || resolution > resolutions {
            return Err(StitchError::InvalidLayout(format!(
                "resolution {resolution} outside 1..={resolutions}"
            )));
        }
        let max_index = resolution + resolutions;

        Ok(Self {
            resolution,
            timestamps: Timestamps::open(tree, resolution)?,
            avg: Values::open(tree, resolution)?,
            max: Values::open(tree, max_index)?,
        })
    }

    /// The resolution level these rows belong to.
    #[must_use]
    pub fn resolution(&self) -> usize {
        self.resolution
    }
}

impl Iterator for PairedRows<'_> {
    type Item = Result<CombinedRow, StitchError>;

    fn next(&mut self) -> Option<Self::Item> {
        let timestamp = self.timestamps.next()?;
        let avg = self.avg.next()?;
        let max = self.max.next()?;

        Some(match (timestamp, avg, max) {
            (Ok(timestamp), Ok(avg), Ok(max)) => Ok(CombinedRow::new(timestamp, avg, max)),
            (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => Err(e),
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
