// 🧩 Shape Transformers - attach each room's students
// Flat:    students: [{id, name}, ...]
// Wrapped: students: {student: [{id, name}, ...]}

use crate::association::AssociationIndex;
use crate::records::{AugmentedRoom, Room, StudentSummary};
use serde_json::{json, Value};

/// Intermediate key used by the wrapped shape
pub const STUDENT_KEY: &str = "student";

fn student_list(students: &[StudentSummary]) -> Value {
    Value::Array(
        students
            .iter()
            .map(|s| json!({"id": s.id, "name": s.name}))
            .collect(),
    )
}

/// ShapeTransformer - turns rooms + index into augmented copies.
///
/// Output order is input room order; input rooms are left as they were.
pub trait ShapeTransformer {
    /// Value placed under `students` for one room
    fn association(&self, students: &[StudentSummary]) -> Value;

    fn transform(&self, rooms: &[Room], index: &AssociationIndex) -> Vec<AugmentedRoom> {
        rooms
            .iter()
            .map(|room| AugmentedRoom::new(room, self.association(index.lookup(room.id))))
            .collect()
    }
}

/// Student list directly under `students`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlatShape;

impl ShapeTransformer for FlatShape {
    fn association(&self, students: &[StudentSummary]) -> Value {
        student_list(students)
    }
}

/// Student list one level down, under `students.student`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WrappedShape;

impl ShapeTransformer for WrappedShape {
    fn association(&self, students: &[StudentSummary]) -> Value {
        let mut wrapper = serde_json::Map::new();
        wrapper.insert(STUDENT_KEY.to_string(), student_list(students));
        Value::Object(wrapper)
    }
}
