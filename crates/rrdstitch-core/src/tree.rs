//! # Archive Tree Access
//!
//! The seam between the stitching pipeline and whatever materialized the
//! archive contents. The pipeline only asks for archive counts, descriptors
//! and the raw text of timing comments and row values; it never inspects the
//! tree itself.

use crate::{ArchiveDescriptor, StitchError};

/// Boxed iterator over raw timing comment texts of one archive.
pub type CommentIter<'t> = Box<dyn Iterator<Item = &'t str> + 't>;

/// Boxed iterator over data rows of one archive; each row is the ordered list
/// of its value slot texts.
pub type RowIter<'t> = Box<dyn Iterator<Item = Vec<&'t str>> + 't>;

/// Read access to a dumped round-robin archive file.
///
/// Archive indices are 1-based and follow the block order of the dump.
/// Implementations return `StitchError::ArchiveOutOfRange` for indices
/// outside `1..=archive_count()`.
pub trait ArchiveTree {
    /// Number of archive blocks in the dump.
    fn archive_count(&self) -> usize;

    /// Consolidation function and resolution of one archive.
    fn descriptor(&self, index: usize) -> Result<ArchiveDescriptor, StitchError>;

    /// Timing comments of one archive, in row order.
    fn timing_comments(&self, index: usize) -> Result<CommentIter<'_>, StitchError>;

    /// Data rows of one archive, in row order.
    fn data_rows(&self, index: usize) -> Result<RowIter<'_>, StitchError>;

    /// Check that `index` names an archive of this tree.
    fn check_index(&self, index: usize) -> Result<(), StitchError> {
        let count = self.archive_count();
        if index == 0 || index > count {
            return Err(StitchError::ArchiveOutOfRange { index, count });
        }
        Ok(())
    }
}
