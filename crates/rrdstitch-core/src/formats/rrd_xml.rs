//! # rrdtool XML Dump
//!
//! `ArchiveTree` over the XML produced by `rrdtool dump`.
//!
//! Relevant shape of the document:
//!
//! ```text
//! <rrd>
//!   <rra>
//!     <cf>AVERAGE</cf>
//!     <pdp_per_row>1</pdp_per_row>
//!     <database>
//!       <!-- 2024-05-01 10:00:00 UTC / 1714557600 --> <row><v>1.0e+00</v><v>NaN</v></row>
//!       ...
//!     </database>
//!   </rra>
//!   ...
//! </rrd>
//! ```
//!
//! This is a pure transformation over an in-memory string. Reading the dump
//! from disk is done by the caller.

use crate::tree::{ArchiveTree, CommentIter, RowIter};
use crate::{ArchiveDescriptor, Consolidation, StitchError};
use roxmltree::{Document, Node, ParsingOptions};

const ROOT_TAG: &str = "rrd";
const ARCHIVE_TAG: &str = "rra";
const DATABASE_TAG: &str = "database";
const ROW_TAG: &str = "row";
const VALUE_TAG: &str = "v";
const CF_TAG: &str = "cf";
const PDP_PER_ROW_TAG: &str = "pdp_per_row";

/// A parsed rrdtool XML dump.
pub struct RrdXml<'input> {
    doc: Document<'input>,
    archives: usize,
}

impl<'input> RrdXml<'input> {
    /// Parse dump text.
    ///
    /// `rrdtool dump` emits a DOCTYPE declaration, so DTDs are accepted.
    pub fn parse(text: &'input str) -> Result<Self, StitchError> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = Document::parse_with_options(text, options)
            .map_err(|e| StitchError::TreeParse(e.to_string()))?;

        let root = doc.root_element();
        if !root.has_tag_name(ROOT_TAG) {
            return Err(StitchError::TreeParse(format!(
                "expected <{ROOT_TAG}> root element, found <{}>",
                root.tag_name().name()
            )));
        }
        let archives = root
            .children()
            .filter(|n| n.has_tag_name(ARCHIVE_TAG))
            .count();

        Ok(Self { doc, archives })
    }

    fn archive(&self, index: usize) -> Result<Node<'_, 'input>, StitchError> {
        self.check_index(index)?;
        self.doc
            .root_element()
            .children()
            .filter(|n| n.has_tag_name(ARCHIVE_TAG))
            .nth(index - 1)
            .ok_or(StitchError::ArchiveOutOfRange {
                index,
                count: self.archives,
            })
    }

    fn database(&self, index: usize) -> Result<Node<'_, 'input>, StitchError> {
        child(self.archive(index)?, DATABASE_TAG)
            .ok_or_else(|| StitchError::malformed(index, "missing <database> element"))
    }
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(tag))
}

fn child_text<'a>(node: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    child(node, tag).map(|n| n.text().unwrap_or(""))
}

impl ArchiveTree for RrdXml<'_> {
    fn archive_count(&self) -> usize {
        self.archives
    }

    fn descriptor(&self, index: usize) -> Result<ArchiveDescriptor, StitchError> {
        let archive = self.archive(index)?;
        let cf = child_text(archive, CF_TAG)
            .ok_or_else(|| StitchError::malformed(index, "missing <cf> element"))?;
        let steps = child_text(archive, PDP_PER_ROW_TAG)
            .ok_or_else(|| StitchError::malformed(index, "missing <pdp_per_row> element"))?;
        let steps_per_row = steps.trim().parse::<u64>().map_err(|e| {
            StitchError::malformed(index, format!("invalid pdp_per_row '{}': {e}", steps.trim()))
        })?;

        Ok(ArchiveDescriptor {
            consolidation: Consolidation::parse(cf),
            steps_per_row,
        })
    }

    fn timing_comments(&self, index: usize) -> Result<CommentIter<'_>, StitchError> {
        let database = self.database(index)?;
        Ok(Box::new(
            database
                .children()
                .filter(|n| n.is_comment())
                .map(|n| n.text().unwrap_or("")),
        ))
    }

    fn data_rows(&self, index: usize) -> Result<RowIter<'_>, StitchError> {
        let database = self.database(index)?;
        Ok(Box::new(
            database
                .children()
                .filter(|n| n.has_tag_name(ROW_TAG))
                .map(|row| {
                    row.children()
                        .filter(|v| v.has_tag_name(VALUE_TAG))
                        .map(|v| v.text().unwrap_or(""))
                        .collect()
                }),
        ))
    }
}

// =============================================================================
// TESTS
// =============================================================================
