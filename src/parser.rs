// 📥 Record Source - decode room/student collections from JSON files
// One source per file; records come back in file order.

use crate::error::{PipelineError, Result};
use crate::records::{Fields, Loadable};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension every input file must carry
pub const INPUT_EXTENSION: &str = "json";

// ============================================================================
// PATH VALIDATION
// ============================================================================

/// Check that `path` is an existing regular file with a `.json` extension.
///
/// Only stats the file; nothing is read.
pub fn validate_input_path(path: &Path) -> Result<PathBuf> {
    if !path.is_file() {
        return Err(PipelineError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let has_json_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == INPUT_EXTENSION);

    if !has_json_extension {
        return Err(PipelineError::format(
            path,
            format!("the file must have a '.{}' extension", INPUT_EXTENSION),
        ));
    }

    Ok(path.to_path_buf())
}

// ============================================================================
// RECORD SOURCE
// ============================================================================

/// RecordSource - anything that yields an ordered list of raw records.
///
/// `load` is provided on top of `read_records`: it types every record
/// through `Loadable` and reports the first bad one by position.
pub trait RecordSource {
    /// Where the records come from (used in error messages)
    fn path(&self) -> &Path;

    /// Decode the raw mappings, in source order
    fn read_records(&self) -> Result<Vec<Fields>>;

    fn load<T: Loadable>(&self) -> Result<Vec<T>> {
        let raw = self.read_records()?;
        let mut records = Vec::with_capacity(raw.len());

        for (position, fields) in raw.into_iter().enumerate() {
            let record = T::from_fields(fields).map_err(|message| {
                PipelineError::format(
                    self.path(),
                    format!("{} record {}: {}", T::KIND, position, message),
                )
            })?;
            records.push(record);
        }

        debug!(path = %self.path().display(), kind = T::KIND, count = records.len(), "records loaded");
        Ok(records)
    }
}

/// JSON file holding a top-level array of objects
#[derive(Debug, Clone)]
pub struct JsonRecordSource {
    path: PathBuf,
}

impl JsonRecordSource {
    /// Validate the path and build the source. Fails with `NotFound` or
    /// `Format` before any bytes are read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = validate_input_path(path.as_ref())?;
        Ok(JsonRecordSource { path })
    }
}

impl RecordSource for JsonRecordSource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_records(&self) -> Result<Vec<Fields>> {
        let file = File::open(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PipelineError::NotFound {
                path: self.path.clone(),
            },
            _ => PipelineError::io(&self.path, e),
        })?;

        let reader = BufReader::new(file);
        let json: Value = serde_json::from_reader(reader)
            .map_err(|e| PipelineError::format(&self.path, format!("not valid JSON: {}", e)))?;

        let items = match json {
            Value::Array(items) => items,
            other => {
                return Err(PipelineError::format(
                    &self.path,
                    format!("expected a JSON array of records, got {}", json_kind(&other)),
                ))
            }
        };

        items
            .into_iter()
            .enumerate()
            .map(|(position, item)| match item {
                Value::Object(fields) => Ok(fields),
                other => Err(PipelineError::format(
                    &self.path,
                    format!("record {} is {}, expected an object", position, json_kind(&other)),
                )),
            })
            .collect()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
