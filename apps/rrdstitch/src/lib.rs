//! # rrdstitch
//!
//! Application layer around `rrdstitch-core`: argument parsing, the
//! `rrdtool dump` step and the output file.

pub mod cli;
pub mod config;
pub mod dump;
