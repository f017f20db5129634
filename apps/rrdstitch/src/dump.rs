//! # Archive Dump
//!
//! Runs `rrdtool dump` into a temporary XML file. The file lives exactly as
//! long as its `DumpArtifact`: it is removed when the artifact is dropped,
//! and immediately when the dump itself fails.

use rrdstitch_core::StitchError;
use std::path::Path;
use std::process::Command;
use tempfile::NamedTempFile;

/// A materialized XML dump of one archive file.
#[derive(Debug)]
pub struct DumpArtifact {
    file: NamedTempFile,
}

impl DumpArtifact {
    /// Dump `rrd_file` with `rrdtool` into a fresh temporary file under
    /// `temp_dir` (the system temp dir if `None`).
    ///
    /// A non-zero exit of the dump process yields
    /// `StitchError::DumpFailed` with its exit status.
    pub fn create(
        rrdtool: &Path,
        rrd_file: &Path,
        temp_dir: Option<&Path>,
    ) -> Result<Self, StitchError> {
        let prefix = format!("{}.", file_stem(rrd_file));
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix).suffix(".xml");
        let file = match temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| StitchError::Io(format!("cannot create dump file: {e}")))?;

        tracing::debug!(
            rrdtool = %rrdtool.display(),
            rrd = %rrd_file.display(),
            xml = %file.path().display(),
            "dumping archive"
        );

        let status = Command::new(rrdtool)
            .arg("dump")
            .arg(rrd_file)
            .arg(file.path())
            .status()
            .map_err(|e| StitchError::Io(format!("cannot run '{}': {e}", rrdtool.display())))?;

        if !status.success() {
            return Err(StitchError::DumpFailed {
                status: status.code(),
            });
        }

        Ok(Self { file })
    }

    /// Location of the XML dump.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// The whole dump as text.
    pub fn read_to_string(&self) -> Result<String, StitchError> {
        std::fs::read_to_string(self.path()).map_err(|e| {
            StitchError::Io(format!("cannot read dump '{}': {e}", self.path().display()))
        })
    }
}

/// File name of the archive, used to make dump files recognizable.
fn file_stem(rrd_file: &Path) -> String {
    rrd_file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "rrd".to_string())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_uses_file_name() {
        assert_eq!(file_stem(Path::new("/data/traffic/eth0.rrd")), "eth0.rrd");
        assert_eq!(file_stem(Path::new("/")), "rrd");
    }

    #[test]
    fn missing_binary_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = DumpArtifact::create(
            Path::new("/nonexistent/rrdtool"),
            Path::new("eth0.rrd"),
            Some(dir.path()),
        );
        assert!(matches!(result, Err(StitchError::Io(_))));
        let leftover = std::fs::read_dir(dir.path()).expect("read dir").count();
        assert_eq!(leftover, 0);
    }
}
