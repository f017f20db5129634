//! # Format Primitives
//!
//! Fixed constants of the archive dump and of the stitched CSV output.

/// Header line of a freshly created output file.
pub const CSV_HEADER: [&str; 6] = [
    "EPOCH",
    "DATETIME",
    "INOCTETS_AVG",
    "OUTOCTETS_AVG",
    "INOCTETS_MAX",
    "OUTOCTETS_MAX",
];

/// Value slots read from every data row (in octets, out octets).
pub const METRIC_SLOTS: usize = 2;

/// Separator between the human readable date and the epoch in a timing
/// comment (`<!-- 2024-05-01 10:00:00 UTC / 1714557600 -->`).
pub const TIMING_SEPARATOR: char = '/';

/// Consolidation families stored in the dump, in block order.
pub const CONSOLIDATION_FAMILIES: usize = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_has_one_column_per_field() {
        assert_eq!(CSV_HEADER.len(), 2 + METRIC_SLOTS * CONSOLIDATION_FAMILIES);
        assert_eq!(CSV_HEADER[0], "EPOCH");
    }
}
