//! # Resume State
//!
//! What an existing output file tells the next run: whether it already holds
//! output (no header needed) and the last persisted epoch (the threshold).

use crate::StitchError;
use csv::{ByteRecord, ReaderBuilder};
use serde::Serialize;
use std::io::Read;

/// High-water mark of a previously written output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResumeState {
    has_output: bool,
    threshold: Option<i64>,
}

impl ResumeState {
    /// No prior output: write a header and every row.
    #[must_use]
    pub const fn fresh() -> Self {
        Self {
            has_output: false,
            threshold: None,
        }
    }

    /// Prior output ending at `epoch`.
    #[must_use]
    pub const fn resumed(epoch: i64) -> Self {
        Self {
            has_output: true,
            threshold: Some(epoch),
        }
    }

    /// Read the state from the existing output.
    ///
    /// The whole input is scanned; only the last record is kept. A last
    /// record whose first field is not an integer (a lone header, a torn
    /// line) yields prior output without a threshold. Only I/O failures are
    /// errors.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, StitchError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut record = ByteRecord::new();
        let mut last = ByteRecord::new();
        let mut has_output = false;
        loop {
            match reader.read_byte_record(&mut record) {
                Ok(true) => {
                    std::mem::swap(&mut record, &mut last);
                    has_output = true;
                }
                Ok(false) => break,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(_) => {
                    return Ok(Self {
                        has_output: true,
                        threshold: None,
                    });
                }
            }
        }

        let threshold = if has_output {
            last.get(0)
                .and_then(|field| std::str::from_utf8(field).ok())
                .and_then(|field| field.trim().parse::<i64>().ok())
        } else {
            None
        };

        Ok(Self {
            has_output,
            threshold,
        })
    }

    /// Output already exists, so no header is written.
    #[must_use]
    pub const fn has_output(&self) -> bool {
        self.has_output
    }

    /// Rows at or before this epoch are already persisted.
    #[must_use]
    pub const fn threshold(&self) -> Option<i64> {
        self.threshold
    }
}

// =============================================================================
// TESTS
// =============================================================================
