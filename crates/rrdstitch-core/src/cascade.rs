//! # Resolution Cascade
//!
//! Stitches resolution levels into one ascending series that always uses the
//! finest data available.
//!
//! Levels are supplied coarsest first. The cascade reads the current level
//! while holding the head row of the next finer level (the successor) in a
//! one-row lookahead. As soon as the current level reaches an epoch at or
//! past that head, the current row is dropped, the head is emitted, and the
//! successor becomes the current level. The finest level has no successor
//! and is drained to the end.
//!
//! ```text
//! coarse:  100  200  300  400
//! fine:              250  260  270
//! output:  100  200  250  260  270
//! ```
//!
//! ## Level Rules
//!
//! - A level never resumes once the cascade has moved past it.
//! - Equal epochs resolve to the finer level.
//! - A level that ends before reaching its successor's head hands over the
//!   head anyway; the head is never lost.
//! - Levels without rows are skipped when choosing a successor.
//! - A promoted level whose head is not before its own successor's head has
//!   nothing to contribute and is skipped as well.
//!
//! Each level must be strictly ascending and each finer level must start
//! inside the range of the level before it. Inputs violating this produce an
//! unspecified order in the violating region.
//!
//! The cascade stops after yielding the first error.

use crate::{StitchError, Timestamped};
use std::collections::VecDeque;

/// A resolution level's rows with its rank in the cascade.
struct Level<I> {
    rank: usize,
    rows: I,
}

/// The successor level with its consumed head row.
struct Lookahead<I, T> {
    level: Level<I>,
    head: T,
}

/// Merges resolution levels, coarsest first, into one ascending series.
pub struct CascadeMerge<I, T> {
    current: Option<Level<I>>,
    successor: Option<Lookahead<I, T>>,
    pending: VecDeque<Level<I>>,
    failed: bool,
}

impl<I, T> CascadeMerge<I, T>
where
    I: Iterator<Item = Result<T, StitchError>>,
    T: Timestamped,
{
    /// Build a cascade over `levels`, ordered coarsest to finest.
    ///
    /// No rows are read until the first call to `next`.
    pub fn new(levels: impl IntoIterator<Item = I>) -> Self {
        let pending = levels
            .into_iter()
            .enumerate()
            .map(|(rank, rows)| Level { rank, rows })
            .collect();
        Self {
            current: None,
            successor: None,
            pending,
            failed: false,
        }
    }

    /// Position (0 = coarsest) of the level currently being read.
    #[must_use]
    pub fn current_level(&self) -> Option<usize> {
        self.current.as_ref().map(|level| level.rank)
    }

    /// Pull pending levels until one yields a row; that level becomes the
    /// successor with the row as its head.
    fn peek_successor(&mut self) -> Result<(), StitchError> {
        self.successor = None;
        while let Some(mut level) = self.pending.pop_front() {
            if let Some(head) = level.rows.next().transpose()? {
                self.successor = Some(Lookahead { level, head });
                return Ok(());
            }
        }
        Ok(())
    }

    /// Make the successor the current level and return its head, or the
    /// next pending level with no head when the cascade is just starting.
    fn promote(&mut self) -> Result<Option<T>, StitchError> {
        loop {
            match self.successor.take() {
                Some(Lookahead { level, head }) => {
                    self.current = Some(level);
                    self.peek_successor()?;
                    let superseded = self
                        .successor
                        .as_ref()
                        .is_some_and(|next| head.epoch() >= next.head.epoch());
                    if superseded {
                        self.current = None;
                        continue;
                    }
                    return Ok(Some(head));
                }
                None => {
                    self.current = self.pending.pop_front();
                    if self.current.is_none() {
                        return Ok(None);
                    }
                    self.peek_successor()?;
                    return Ok(None);
                }
            }
        }
    }

    fn advance(&mut self) -> Result<Option<T>, StitchError> {
        loop {
            let Some(current) = self.current.as_mut() else {
                if self.successor.is_none() && self.pending.is_empty() {
                    return Ok(None);
                }
                if let Some(head) = self.promote()? {
                    return Ok(Some(head));
                }
                continue;
            };

            match current.rows.next().transpose()? {
                Some(row) => {
                    let switch = self
                        .successor
                        .as_ref()
                        .is_some_and(|next| row.epoch() >= next.head.epoch());
                    if !switch {
                        return Ok(Some(row));
                    }
                    self.current = None;
                }
                None => self.current = None,
            }
        }
    }
}

impl<I, T> Iterator for CascadeMerge<I, T>
where
    I: Iterator<Item = Result<T, StitchError>>,
    T: Timestamped,
{
    type Item = Result<T, StitchError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.advance() {
            Ok(row) => row.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
