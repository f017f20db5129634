//! # Dump Formats
//!
//! Concrete `ArchiveTree` implementations. File I/O lives in the app layer;
//! everything here works on in-memory text.

mod rrd_xml;

pub use rrd_xml::RrdXml;
