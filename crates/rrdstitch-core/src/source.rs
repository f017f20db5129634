//! # Archive Row Source
//!
//! Lazy, single-pass readers over one archive of an `ArchiveTree`.
//!
//! - `Timestamps` parses the timing comments (`date / epoch`)
//! - `Values` parses the first two value slots of every row
//! - `ArchiveRows` zips both into `ArchiveRow`s
//!
//! Each reader owns its own cursor into the tree. None of them can be
//! rewound; open a new one to read an archive again.

use crate::primitives::{METRIC_SLOTS, TIMING_SEPARATOR};
use crate::tree::{ArchiveTree, CommentIter, RowIter};
use crate::{ArchiveRow, Metrics, StitchError, Timestamp};

/// Parse one timing comment of archive `index`.
///
/// The comment must hold exactly one separator with an integer epoch after
/// it; surrounding whitespace is ignored.
pub fn parse_timing(index: usize, raw: &str) -> Result<Timestamp, StitchError> {
    let content = raw.trim();
    let mut parts = content.split(TIMING_SEPARATOR);
    let (Some(date), Some(epoch), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(StitchError::malformed(
            index,
            format!("timing comment '{content}' is not 'date / epoch'"),
        ));
    };

    let epoch = epoch.trim().parse::<i64>().map_err(|e| {
        StitchError::malformed(index, format!("invalid epoch '{}': {e}", epoch.trim()))
    })?;

    Ok(Timestamp::new(epoch, date.trim()))
}

/// Parse the value slots of one data row of archive `index`.
///
/// Rows with more slots than `METRIC_SLOTS` contribute their leading slots.
pub fn parse_metrics(index: usize, slots: &[&str]) -> Result<Metrics, StitchError> {
    if slots.len() < METRIC_SLOTS {
        return Err(StitchError::malformed(
            index,
            format!(
                "row has {} value slots, expected {METRIC_SLOTS}",
                slots.len()
            ),
        ));
    }

    let parse = |raw: &str| {
        raw.trim().parse::<f64>().map_err(|e| {
            StitchError::malformed(index, format!("invalid value '{}': {e}", raw.trim()))
        })
    };

    Ok(Metrics::new(parse(slots[0])?, parse(slots[1])?))
}

// =============================================================================
// TIMESTAMPS
// =============================================================================

/// Timing metadata of one archive, in row order.
pub struct Timestamps<'t> {
    index: usize,
    comments: CommentIter<'t>,
}

impl<'t> Timestamps<'t> {
    pub fn open<T: ArchiveTree + ?Sized>(tree: &'t T, index: usize) -> Result<Self, StitchError> {
        Ok(Self {
            index,
            comments: tree.timing_comments(index)?,
        })
    }
}

impl Iterator for Timestamps<'_> {
    type Item = Result<Timestamp, StitchError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.comments
            .next()
            .map(|raw| parse_timing(self.index, raw))
    }
}

// =============================================================================
// VALUES
// =============================================================================

/// Metric values of one archive, in row order.
pub struct Values<'t> {
    index: usize,
    rows: RowIter<'t>,
}

impl<'t> Values<'t> {
    pub fn open<T: ArchiveTree + ?Sized>(tree: &'t T, index: usize) -> Result<Self, StitchError> {
        Ok(Self {
            index,
            rows: tree.data_rows(index)?,
        })
    }
}

impl Iterator for Values<'_> {
    type Item = Result<Metrics, StitchError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows
            .next()
            .map(|slots| parse_metrics(self.index, &slots))
    }
}

// =============================================================================
// ARCHIVE ROWS
// =============================================================================

/// Timestamped rows of one archive. Ends with the shorter of the timing
/// comments and the data rows.
pub struct ArchiveRows<'t> {
    timestamps: Timestamps<'t>,
    values: Values<'t>,
}

impl<'t> ArchiveRows<'t> {
    pub fn open<T: ArchiveTree + ?Sized>(tree: &'t T, index: usize) -> Result<Self, StitchError> {
        Ok(Self {
            timestamps: Timestamps::open(tree, index)?,
            values: Values::open(tree, index)?,
        })
    }
}

impl Iterator for ArchiveRows<'_> {
    type Item = Result<ArchiveRow, StitchError>;

    fn next(&mut self) -> Option<Self::Item> {
        let timestamp = self.timestamps.next()?;
        let metrics = self.values.next()?;
        Some(timestamp.and_then(|timestamp| {
            metrics.map(|metrics| ArchiveRow { timestamp, metrics })
        }))
    }
}

// =============================================================================
// TESTS
// =============================================================================
