// Roster Merge - Core Library
// Joins students onto their rooms and emits the result as JSON or XML.
// Exposes all modules for use in the CLI and tests.

pub mod error;
pub mod records;
pub mod parser;      // Record Source - JSON input files
pub mod association; // room id → students, built once per run
pub mod transform;   // flat vs wrapped `students` shape
pub mod serializer;  // JSON / XML encoders
pub mod output;      // atomic file writer
pub mod config;
pub mod pipeline;

// Re-export commonly used types
pub use error::{PipelineError, Result};
pub use records::{
    AugmentedRoom, Fields, Loadable, Room, RoomId, Student, StudentSummary,
};
pub use parser::{JsonRecordSource, RecordSource, validate_input_path};
pub use association::{Associable, AssociationIndex};
pub use transform::{FlatShape, ShapeTransformer, WrappedShape};
pub use serializer::{JsonSerializer, RoomSerializer, XmlSerializer};
pub use output::OutputFile;
pub use config::{OutputFormat, PipelineConfig};
pub use pipeline::{Pipeline, RunReport, Stage, Strategy};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
