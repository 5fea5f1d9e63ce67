// ⚠️ Error taxonomy for the roster pipeline
// Every failure aborts the run; nothing here is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by any stage of the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input path is missing or is not a regular file.
    #[error("'{}' is not a file or does not exist", path.display())]
    NotFound { path: PathBuf },

    /// Input is not the structured data we expect (wrong extension, bad JSON,
    /// wrong shape, missing/mistyped required field).
    #[error("invalid input '{}': {message}", path.display())]
    Format { path: PathBuf, message: String },

    /// Requested output format is not one we can produce.
    #[error("unknown output format '{requested}'. Use {supported}")]
    UnsupportedFormat {
        requested: String,
        supported: String,
    },

    /// Output encoding cannot represent the transformed data.
    #[error("cannot encode as {format}: {message}")]
    Serialization {
        format: &'static str,
        message: String,
    },

    /// Read or write failure at the I/O boundary.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn format(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Format {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn serialization(format: &'static str, message: impl Into<String>) -> Self {
        Self::Serialization {
            format,
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
