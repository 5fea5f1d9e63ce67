// 📇 Record types - Rooms, Students and the augmented output rows
// Core fields are typed, everything else rides along untouched in `fields`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Room identifier (foreign key target of `Student::room`)
pub type RoomId = i64;

/// Raw key/value mapping of one record, in source key order
pub type Fields = Map<String, Value>;

/// Key under which the association is attached to each room
pub const STUDENTS_KEY: &str = "students";

// ============================================================================
// LOADABLE
// ============================================================================

/// A record kind that can be built from one decoded mapping.
///
/// Implementors pull out the fields the pipeline relies on and keep the
/// rest for pass-through. Failures are plain messages; the record source
/// adds the file and position.
pub trait Loadable: Sized {
    /// Singular name of the record kind, used in error messages
    const KIND: &'static str;

    fn from_fields(fields: Fields) -> Result<Self, String>;
}

fn required_int(fields: &Fields, key: &str) -> Result<i64, String> {
    let value = fields
        .get(key)
        .ok_or_else(|| format!("missing required field '{}'", key))?;

    value
        .as_i64()
        .ok_or_else(|| format!("field '{}' must be an integer, got {}", key, value))
}

fn required_str(fields: &Fields, key: &str) -> Result<String, String> {
    let value = fields
        .get(key)
        .ok_or_else(|| format!("missing required field '{}'", key))?;

    value
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| format!("field '{}' must be a string, got {}", key, value))
}

// ============================================================================
// ROOM
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: RoomId,
    /// Full original mapping, `id` included
    pub fields: Fields,
}

impl Room {
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(|v| v.as_str())
    }
}

impl Loadable for Room {
    const KIND: &'static str = "room";

    fn from_fields(fields: Fields) -> Result<Self, String> {
        let id = required_int(&fields, "id")?;
        Ok(Room { id, fields })
    }
}

// ============================================================================
// STUDENT
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: i64,
    pub name: String,
    /// Foreign key into `Room::id`; may point at a room that doesn't exist
    pub room: RoomId,
    pub fields: Fields,
}

impl Student {
    /// The `{id, name}` projection that ends up under a room
    pub fn summary(&self) -> StudentSummary {
        StudentSummary {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

impl Loadable for Student {
    const KIND: &'static str = "student";

    fn from_fields(fields: Fields) -> Result<Self, String> {
        let id = required_int(&fields, "id")?;
        let name = required_str(&fields, "name")?;
        let room = required_int(&fields, "room")?;
        Ok(Student {
            id,
            name,
            room,
            fields,
        })
    }
}

/// `{id, name}` projection of a student, serialized in that key order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub id: i64,
    pub name: String,
}

// ============================================================================
// AUGMENTED ROOM
// ============================================================================

/// A copy of a room's fields with the `students` association attached.
///
/// The source `Room` is never touched; if the room already carried a
/// `students` field it is replaced in place, keeping its key position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AugmentedRoom {
    fields: Fields,
}

impl AugmentedRoom {
    pub fn new(room: &Room, students: Value) -> Self {
        let mut fields = room.fields.clone();
        fields.insert(STUDENTS_KEY.to_string(), students);
        AugmentedRoom { fields }
    }

    pub fn id(&self) -> Option<RoomId> {
        self.fields.get("id").and_then(|v| v.as_i64())
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn students(&self) -> Option<&Value> {
        self.fields.get(STUDENTS_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn test_room_from_fields_keeps_extra_fields() {
        let room = Room::from_fields(fields(json!({"id": 1, "name": "Math", "floor": 3}))).unwrap();

        assert_eq!(room.id, 1);
        assert_eq!(room.name(), Some("Math"));
        assert_eq!(room.fields.get("floor"), Some(&json!(3)));
    }

    #[test]
    fn test_room_requires_integer_id() {
        let err = Room::from_fields(fields(json!({"name": "Math"}))).unwrap_err();
        assert_eq!(err, "missing required field 'id'");

        let err = Room::from_fields(fields(json!({"id": "1"}))).unwrap_err();
        assert_eq!(err, "field 'id' must be an integer, got \"1\"");
    }

    #[test]
    fn test_student_requires_core_fields() {
        let student =
            Student::from_fields(fields(json!({"id": 10, "name": "Alice", "room": 1}))).unwrap();
        assert_eq!(student.summary(), StudentSummary { id: 10, name: "Alice".to_string() });
        assert_eq!(student.room, 1);

        let err = Student::from_fields(fields(json!({"id": 10, "name": "Alice"}))).unwrap_err();
        assert_eq!(err, "missing required field 'room'");

        let err = Student::from_fields(fields(json!({"id": 10, "name": 5, "room": 1}))).unwrap_err();
        assert_eq!(err, "field 'name' must be a string, got 5");
    }

    #[test]
    fn test_augmented_room_is_a_copy() {
        let room = Room::from_fields(fields(json!({"id": 2, "name": "Physics"}))).unwrap();
        let augmented = AugmentedRoom::new(&room, json!([]));

        assert_eq!(augmented.students(), Some(&json!([])));
        assert_eq!(augmented.id(), Some(2));
        assert!(!room.fields.contains_key(STUDENTS_KEY));
    }

    #[test]
    fn test_augmented_room_replaces_existing_students_in_place() {
        let room = Room::from_fields(fields(json!({"id": 3, "students": "old", "name": "Lab"}))).unwrap();
        let augmented = AugmentedRoom::new(&room, json!([]));

        let keys: Vec<&str> = augmented.fields().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["id", "students", "name"]);
        assert_eq!(augmented.students(), Some(&json!([])));
    }
}
