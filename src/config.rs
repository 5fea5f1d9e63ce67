// ⚙️ Run configuration - validated once, up front
// Format is checked before anything touches the filesystem.

use crate::error::{PipelineError, Result};
use crate::parser::validate_input_path;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_ROOMS_PATH: &str = "rooms.json";
pub const DEFAULT_STUDENTS_PATH: &str = "students.json";

// ============================================================================
// OUTPUT FORMAT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Xml,
}

impl OutputFormat {
    /// Every format we can produce, in the order shown to users
    pub const SUPPORTED: [OutputFormat; 2] = [OutputFormat::Json, OutputFormat::Xml];

    /// Name accepted on the command line
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Xml => "xml",
        }
    }

    /// Extension of the generated file
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Xml => "xml",
        }
    }

    /// "json or xml"
    pub fn supported_list() -> String {
        Self::SUPPORTED
            .iter()
            .map(|f| f.name())
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

impl FromStr for OutputFormat {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::SUPPORTED
            .iter()
            .copied()
            .find(|format| format.name() == s)
            .ok_or_else(|| PipelineError::UnsupportedFormat {
                requested: s.to_string(),
                supported: Self::supported_list(),
            })
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// PIPELINE CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub rooms_path: PathBuf,
    pub students_path: PathBuf,
    pub format: OutputFormat,
    /// Directory receiving `students_rooms_data.<ext>`
    pub output_dir: PathBuf,
}

impl PipelineConfig {
    /// Validate raw settings into a config.
    ///
    /// Order matters: an unknown format fails before any path is looked at,
    /// then rooms, then students.
    pub fn new(
        rooms_path: impl AsRef<Path>,
        students_path: impl AsRef<Path>,
        format: &str,
    ) -> Result<Self> {
        let format = OutputFormat::from_str(format)?;
        let rooms_path = validate_input_path(rooms_path.as_ref())?;
        let students_path = validate_input_path(students_path.as_ref())?;

        Ok(PipelineConfig {
            rooms_path,
            students_path,
            format,
            output_dir: PathBuf::from("."),
        })
    }

    /// Builder pattern: write into `dir` instead of the working directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}
