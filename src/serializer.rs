// 📤 Serializers - augmented rooms → final document text
// JSON: plain array of room objects.
// XML:  <rooms> root, one <room> per entry, arrays become repeated tags.

use crate::error::{PipelineError, Result};
use crate::records::AugmentedRoom;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::Value;
use std::io::{self, Write};

/// Root element of the XML document
pub const ROOT_TAG: &str = "rooms";

/// Element wrapping each room in the XML document
pub const ITEM_TAG: &str = "room";

/// RoomSerializer - encode the whole room list in one go.
pub trait RoomSerializer {
    /// Encoding name, as used in error messages
    fn name(&self) -> &'static str;

    fn serialize(&self, rooms: &[AugmentedRoom]) -> Result<String>;
}

// ============================================================================
// JSON
// ============================================================================

/// Compatible with the consumers' JSON style: `", "` and `": "` separators,
/// DEL and everything outside ASCII written as `\uXXXX` escapes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacedAsciiFormatter;

impl Formatter for SpacedAsciiFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            // DEL is escaped along with everything outside ASCII
            if ch.is_ascii() && ch != '\x7f' {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonSerializer;

impl RoomSerializer for JsonSerializer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn serialize(&self, rooms: &[AugmentedRoom]) -> Result<String> {
        let mut buffer = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buffer, SpacedAsciiFormatter);
        rooms
            .serialize(&mut ser)
            .map_err(|e| PipelineError::serialization(self.name(), e.to_string()))?;

        String::from_utf8(buffer).map_err(|e| PipelineError::serialization(self.name(), e.to_string()))
    }
}

// ============================================================================
// XML
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XmlSerializer;

impl XmlSerializer {
    fn emit<W: io::Write>(&self, writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
        writer
            .write_event(event)
            .map_err(|e| PipelineError::serialization(self.name(), format!("write error: {e}")))
    }

    fn check_name(&self, key: &str) -> Result<()> {
        if is_xml_name(key) {
            Ok(())
        } else {
            Err(PipelineError::serialization(
                self.name(),
                format!("'{}' is not a valid element name", key),
            ))
        }
    }

    /// A named field: arrays fan out into one element per item
    fn write_field<W: io::Write>(&self, writer: &mut Writer<W>, key: &str, value: &Value) -> Result<()> {
        self.check_name(key)?;

        match value {
            Value::Array(items) => {
                for item in items {
                    if item.is_array() {
                        return Err(PipelineError::serialization(
                            self.name(),
                            format!("field '{}' holds a nested array", key),
                        ));
                    }
                    self.write_element(writer, key, item)?;
                }
                Ok(())
            }
            _ => self.write_element(writer, key, value),
        }
    }

    fn write_element<W: io::Write>(&self, writer: &mut Writer<W>, tag: &str, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.emit(writer, Event::Empty(BytesStart::new(tag))),
            // Only empty arrays below means no child element gets written
            Value::Object(fields) if fields.values().all(is_empty_array) => {
                for key in fields.keys() {
                    self.check_name(key)?;
                }
                self.emit(writer, Event::Empty(BytesStart::new(tag)))
            }
            Value::Object(fields) => {
                self.emit(writer, Event::Start(BytesStart::new(tag)))?;
                for (key, child) in fields {
                    self.write_field(writer, key, child)?;
                }
                self.emit(writer, Event::End(BytesEnd::new(tag)))
            }
            Value::Array(_) => Err(PipelineError::serialization(
                self.name(),
                format!("element '{}' holds a nested array", tag),
            )),
            scalar => {
                let text = scalar_text(scalar);
                if !text.chars().all(is_xml_char) {
                    return Err(PipelineError::serialization(
                        self.name(),
                        format!("field '{}' contains a character XML cannot represent", tag),
                    ));
                }
                self.emit(writer, Event::Start(BytesStart::new(tag)))?;
                self.emit(writer, Event::Text(BytesText::new(&text)))?;
                self.emit(writer, Event::End(BytesEnd::new(tag)))
            }
        }
    }
}

impl RoomSerializer for XmlSerializer {
    fn name(&self) -> &'static str {
        "xml"
    }

    fn serialize(&self, rooms: &[AugmentedRoom]) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        self.emit(&mut writer, Event::Start(BytesStart::new(ROOT_TAG)))?;
        for room in rooms {
            self.emit(&mut writer, Event::Start(BytesStart::new(ITEM_TAG)))?;
            for (key, value) in room.fields() {
                self.write_field(&mut writer, key, value)?;
            }
            self.emit(&mut writer, Event::End(BytesEnd::new(ITEM_TAG)))?;
        }
        self.emit(&mut writer, Event::End(BytesEnd::new(ROOT_TAG)))?;

        String::from_utf8(writer.into_inner())
            .map_err(|e| PipelineError::serialization(self.name(), e.to_string()))
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn is_empty_array(value: &Value) -> bool {
    matches!(value, Value::Array(items) if items.is_empty())
}

/// Characters allowed in XML 1.0 text
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Element names: letter or `_` first, then letters, digits, `-`, `_`, `.`
fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
