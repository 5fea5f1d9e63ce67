// End-to-end runs against real files

use pretty_assertions::assert_eq;
use quick_xml::events::Event;
use quick_xml::Reader;
use roster_merge::{
    AssociationIndex, JsonRecordSource, Pipeline, PipelineConfig, PipelineError, RecordSource,
    Student,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const ROOMS: &str = r#"[
    {"id": 1, "name": "Math"},
    {"id": 2, "name": "Physics"},
    {"id": 3, "name": "Chemistry", "floor": 2}
]"#;

const STUDENTS: &str = r#"[
    {"id": 10, "name": "Alice", "room": 1, "sex": "F"},
    {"id": 11, "name": "Bob", "room": 2},
    {"id": 12, "name": "Carl", "room": 1},
    {"id": 4, "name": "Dana", "room": 1},
    {"id": 13, "name": "Ghost", "room": 99}
]"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new(rooms: &str, students: &str) -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("rooms.json"), rooms).unwrap();
        fs::write(dir.path().join("students.json"), students).unwrap();
        Fixture { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn run(&self, format: &str) -> String {
        let config = PipelineConfig::new(self.path("rooms.json"), self.path("students.json"), format)
            .unwrap()
            .with_output_dir(self.dir.path());
        let report = Pipeline::new(config).run().unwrap();
        fs::read_to_string(report.output.unwrap()).unwrap()
    }

    fn index(&self) -> AssociationIndex {
        let students: Vec<Student> = JsonRecordSource::open(self.path("students.json"))
            .unwrap()
            .load()
            .unwrap();
        AssociationIndex::build(&students)
    }
}

/// room id → student ids, read back from the XML document
fn xml_students_per_room(xml: &str) -> BTreeMap<i64, Vec<i64>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<String> = Vec::new();
    let mut rooms = BTreeMap::new();
    let mut current_room = None;

    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) => stack.push(String::from_utf8(e.name().as_ref().to_vec()).unwrap()),
            Event::End(_) => {
                stack.pop();
            }
            Event::Empty(e) => {
                // <students/> still means the room was seen
                if e.name().as_ref() == b"students" {
                    if let Some(room) = current_room {
                        rooms.entry(room).or_insert_with(Vec::new);
                    }
                }
            }
            Event::Text(t) => {
                let text = t.unescape().unwrap().to_string();
                let path: Vec<&str> = stack.iter().map(String::as_str).collect();
                match path.as_slice() {
                    ["rooms", "room", "id"] => {
                        let id: i64 = text.parse().unwrap();
                        current_room = Some(id);
                    }
                    ["rooms", "room", "students", "student", "id"] => {
                        let id: i64 = text.parse().unwrap();
                        rooms
                            .entry(current_room.unwrap())
                            .or_insert_with(Vec::new)
                            .push(id);
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    rooms
}

#[test]
fn json_output_matches_index_per_room() {
    let fixture = Fixture::new(ROOMS, STUDENTS);
    let document: Value = serde_json::from_str(&fixture.run("json")).unwrap();
    let index = fixture.index();

    let rooms = document.as_array().unwrap();
    assert_eq!(rooms.len(), 3);

    for room in rooms {
        let id = room["id"].as_i64().unwrap();
        let listed: Vec<(i64, String)> = room["students"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| (s["id"].as_i64().unwrap(), s["name"].as_str().unwrap().to_string()))
            .collect();
        let expected: Vec<(i64, String)> = index
            .lookup(id)
            .iter()
            .map(|s| (s.id, s.name.clone()))
            .collect();
        assert_eq!(listed, expected);
    }
}

#[test]
fn json_output_keeps_input_order_and_extra_room_fields() {
    let fixture = Fixture::new(ROOMS, STUDENTS);
    let document: Value = serde_json::from_str(&fixture.run("json")).unwrap();

    // Dana (id 4) comes after Carl in the input, so she stays after him
    let math_ids: Vec<i64> = document[0]["students"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect();
    assert_eq!(math_ids, vec![10, 12, 4]);

    // Only id/name are projected
    assert_eq!(document[0]["students"][0].as_object().unwrap().len(), 2);

    assert_eq!(document[2]["floor"], Value::from(2));
    assert_eq!(document[2]["students"], Value::Array(vec![]));
}

#[test]
fn xml_output_carries_same_lists_as_json() {
    let fixture = Fixture::new(ROOMS, STUDENTS);
    let json: Value = serde_json::from_str(&fixture.run("json")).unwrap();
    let xml = fixture.run("xml");

    let from_xml = xml_students_per_room(&xml);

    let mut from_json = BTreeMap::new();
    for room in json.as_array().unwrap() {
        let ids: Vec<i64> = room["students"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["id"].as_i64().unwrap())
            .collect();
        from_json.insert(room["id"].as_i64().unwrap(), ids);
    }

    assert_eq!(from_xml, from_json);
    // Chemistry has nobody: still listed, with an empty <students/>
    assert_eq!(from_xml.get(&3), Some(&Vec::new()));
    assert_eq!(xml.matches("<students/>").count(), 1);
    assert!(xml.starts_with("<rooms>"));
    assert!(xml.ends_with("</rooms>"));
}

#[test]
fn dangling_students_appear_nowhere() {
    let fixture = Fixture::new(ROOMS, STUDENTS);
    let document = fixture.run("json");
    assert!(!document.contains("Ghost"));

    let xml = fixture.run("xml");
    assert!(!xml.contains("Ghost"));
}

#[test]
fn unsupported_format_fails_before_reading_inputs() {
    let dir = TempDir::new().unwrap();
    let err = PipelineConfig::new(dir.path().join("rooms.json"), dir.path().join("students.json"), "yaml")
        .unwrap_err();
    assert!(matches!(err, PipelineError::UnsupportedFormat { .. }));
}

#[test]
fn missing_students_file_is_not_found() {
    let fixture = Fixture::new(ROOMS, STUDENTS);
    fs::remove_file(fixture.path("students.json")).unwrap();

    let err = PipelineConfig::new(fixture.path("rooms.json"), fixture.path("students.json"), "json")
        .unwrap_err();
    assert!(matches!(err, PipelineError::NotFound { .. }));
}

#[test]
fn input_removed_after_config_still_reports_not_found() {
    let fixture = Fixture::new(ROOMS, STUDENTS);
    let config = PipelineConfig::new(fixture.path("rooms.json"), fixture.path("students.json"), "xml")
        .unwrap()
        .with_output_dir(fixture.dir.path());
    fs::remove_file(fixture.path("rooms.json")).unwrap();

    let err = Pipeline::new(config).run().unwrap_err();
    assert!(matches!(err, PipelineError::NotFound { .. }));
    assert!(!fixture.path("students_rooms_data.xml").exists());
}

#[test]
fn record_source_reads_raw_records_in_order() {
    let fixture = Fixture::new(ROOMS, STUDENTS);
    let raw = JsonRecordSource::open(fixture.path("rooms.json"))
        .unwrap()
        .read_records()
        .unwrap();

    let names: Vec<&str> = raw.iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Math", "Physics", "Chemistry"]);
}
