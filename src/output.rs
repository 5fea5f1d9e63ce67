// 💾 Output file - write the finished document in one shot
// Writes go through a temp file in the target directory, then get persisted
// over the destination, so a failed run never leaves half a file behind.

use crate::error::{PipelineError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File stem of every generated document
pub const OUTPUT_STEM: &str = "students_rooms_data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    path: PathBuf,
}

impl OutputFile {
    /// `<dir>/students_rooms_data.<extension>`
    pub fn new(dir: impl AsRef<Path>, extension: &str) -> Self {
        let path = dir
            .as_ref()
            .join(format!("{}.{}", OUTPUT_STEM, extension));
        OutputFile { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create or overwrite the destination with `contents`
    pub fn write(&self, contents: &str) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| PipelineError::io(dir, e))?;
        tmp.write_all(contents.as_bytes())
            .map_err(|e| PipelineError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| PipelineError::io(&self.path, e.error))?;

        Ok(())
    }
}
