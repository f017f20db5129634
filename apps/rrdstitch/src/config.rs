//! # Run Configuration
//!
//! Settings for the dump step, read from an optional TOML file and
//! overridden by command line flags (or their environment variables).
//!
//! ```toml
//! rrdtool = "/usr/local/bin/rrdtool"
//! temp_dir = "/var/tmp"
//! ```

use rrdstitch_core::StitchError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default dump binary, looked up on `PATH`.
pub const DEFAULT_RRDTOOL: &str = "rrdtool";

/// Settings of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Binary invoked as `<rrdtool> dump <rrd> <xml>`.
    pub rrdtool: PathBuf,
    /// Directory for the temporary XML dump; the system temp dir if unset.
    pub temp_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rrdtool: PathBuf::from(DEFAULT_RRDTOOL),
            temp_dir: None,
        }
    }
}

impl Config {
    /// Parse TOML text.
    pub fn from_toml(text: &str) -> Result<Self, StitchError> {
        toml::from_str(text).map_err(|e| StitchError::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> Result<Self, StitchError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            StitchError::Config(format!("cannot read '{}': {e}", path.display()))
        })?;
        Self::from_toml(&text)
    }

    /// Build the effective configuration: the file (if any) over the
    /// defaults, then explicit overrides over the file.
    pub fn resolve(
        file: Option<&Path>,
        rrdtool: Option<PathBuf>,
        temp_dir: Option<PathBuf>,
    ) -> Result<Self, StitchError> {
        let mut config = match file {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(rrdtool) = rrdtool {
            config.rrdtool = rrdtool;
        }
        if temp_dir.is_some() {
            config.temp_dir = temp_dir;
        }
        Ok(config)
    }
}

// =============================================================================
// TESTS
// =============================================================================
