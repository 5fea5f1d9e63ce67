// 🚰 Pipeline - load → associate → transform → serialize → write
// Straight-line batch run; the first error aborts it and nothing is written.

use crate::association::AssociationIndex;
use crate::config::{OutputFormat, PipelineConfig};
use crate::error::Result;
use crate::output::OutputFile;
use crate::parser::{JsonRecordSource, RecordSource};
use crate::records::{AugmentedRoom, Room, Student};
use crate::serializer::{JsonSerializer, RoomSerializer, XmlSerializer};
use crate::transform::{FlatShape, ShapeTransformer, WrappedShape};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

// ============================================================================
// STRATEGY
// ============================================================================

/// Shape + encoding pair for one output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Json(FlatShape, JsonSerializer),
    Xml(WrappedShape, XmlSerializer),
}

impl Strategy {
    pub fn for_format(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Strategy::Json(FlatShape, JsonSerializer),
            OutputFormat::Xml => Strategy::Xml(WrappedShape, XmlSerializer),
        }
    }

    pub fn transform(&self, rooms: &[Room], index: &AssociationIndex) -> Vec<AugmentedRoom> {
        match self {
            Strategy::Json(shape, _) => shape.transform(rooms, index),
            Strategy::Xml(shape, _) => shape.transform(rooms, index),
        }
    }

    pub fn serialize(&self, rooms: &[AugmentedRoom]) -> Result<String> {
        match self {
            Strategy::Json(_, encoder) => encoder.serialize(rooms),
            Strategy::Xml(_, encoder) => encoder.serialize(rooms),
        }
    }
}

// ============================================================================
// STAGES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Stage {
    Created,
    Loaded,
    Associated,
    Transformed,
    Serialized,
    Written,
}

/// Summary of one finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub format: OutputFormat,
    pub rooms: usize,
    pub students: usize,
    /// Students attached to some room
    pub matched: usize,
    /// Students pointing at a room that isn't there
    pub unmatched: usize,
    /// Destination file, `None` when the document was only rendered
    pub output: Option<PathBuf>,
    pub bytes: usize,
}

// ============================================================================
// PIPELINE
// ============================================================================

pub struct Pipeline {
    config: PipelineConfig,
    strategy: Strategy,
    stage: Stage,
}

impl Pipeline {
    /// Strategy is picked here, once, from the configured format
    pub fn new(config: PipelineConfig) -> Self {
        let strategy = Strategy::for_format(config.format);
        Pipeline {
            config,
            strategy,
            stage: Stage::Created,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Last stage reached (stays put when a stage fails)
    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn advance(&mut self, stage: Stage) {
        debug!(from = ?self.stage, to = ?stage, "pipeline stage");
        self.stage = stage;
    }

    /// Run every stage up to `Serialized` and hand back the document
    pub fn render(&mut self) -> Result<(String, RunReport)> {
        let rooms: Vec<Room> = JsonRecordSource::open(&self.config.rooms_path)?.load()?;
        let students: Vec<Student> = JsonRecordSource::open(&self.config.students_path)?.load()?;
        info!(rooms = rooms.len(), students = students.len(), "inputs loaded");
        self.advance(Stage::Loaded);

        let index = AssociationIndex::build(&students);
        let unmatched = index.unmatched(&rooms);
        if unmatched > 0 {
            debug!(unmatched, "students reference rooms that do not exist");
        }
        self.advance(Stage::Associated);

        let augmented = self.strategy.transform(&rooms, &index);
        self.advance(Stage::Transformed);

        let document = self.strategy.serialize(&augmented)?;
        info!(format = %self.config.format, bytes = document.len(), "document serialized");
        self.advance(Stage::Serialized);

        let report = RunReport {
            format: self.config.format,
            rooms: rooms.len(),
            students: students.len(),
            matched: students.len() - unmatched,
            unmatched,
            output: None,
            bytes: document.len(),
        };

        Ok((document, report))
    }

    /// Full run: render, then write `students_rooms_data.<ext>`
    pub fn run(&mut self) -> Result<RunReport> {
        let (document, mut report) = self.render()?;

        let output = OutputFile::new(&self.config.output_dir, self.config.format.extension());
        output.write(&document)?;
        info!(path = %output.path().display(), "output written");
        self.advance(Stage::Written);

        report.output = Some(output.path().to_path_buf());
        Ok(report)
    }
}
