//! Export of a document to its wire format
//!
//! Identities are never written. `ver` always comes first and is always the
//! required literal, whatever the in-memory value. Members whose value is
//! null or the empty string are dropped at every depth; array elements are
//! dropped only when null.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};

use crate::document::{ConfigDocument, Entity};
use crate::schema::{global, SchemaKind};
use crate::Result;

/// Indentation used when no other width is requested
pub const DEFAULT_INDENT: usize = 4;

const SECTION_KEYS: [&str; 3] = ["sources", "systems", "plugins"];

/// Remove empty members recursively; `None` when the value itself is empty
pub fn strip_empty(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::Array(items) => Some(Value::Array(items.into_iter().filter_map(strip_element).collect())),
        Value::Object(map) => Some(Value::Object(strip_map(map))),
        other => Some(other),
    }
}

// Array elements are only dropped when null
fn strip_element(value: Value) -> Option<Value> {
    match value {
        Value::String(s) => Some(Value::String(s)),
        other => strip_empty(other),
    }
}

fn strip_map(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .filter_map(|(key, value)| strip_empty(value).map(|v| (key, v)))
        .collect()
}

fn records(entities: &[Entity]) -> Value {
    Value::Array(
        entities
            .iter()
            .map(|entity| Value::Object(strip_map(entity.to_record())))
            .collect(),
    )
}

/// Build the wire-format object for a document
pub fn to_value(document: &ConfigDocument) -> Value {
    let mut root = Map::new();
    root.insert(global::VERSION_KEY.to_string(), Value::from(global::REQUIRED_VERSION));

    for (key, value) in strip_map(document.global.to_map()) {
        if key == global::VERSION_KEY || SECTION_KEYS.contains(&key.as_str()) {
            continue;
        }
        root.insert(key, value);
    }

    root.insert(SchemaKind::Source.section_name().to_string(), records(&document.sources));
    root.insert(SchemaKind::System.section_name().to_string(), records(&document.systems));
    if !document.plugins.is_empty() {
        root.insert(SchemaKind::Plugin.section_name().to_string(), records(&document.plugins));
    }

    Value::Object(root)
}

/// Serialize a document with the default indentation
pub fn to_json_string(document: &ConfigDocument) -> Result<String> {
    to_json_string_with_indent(document, DEFAULT_INDENT)
}

/// Serialize a document with `indent` spaces per level
pub fn to_json_string_with_indent(document: &ConfigDocument, indent: usize) -> Result<String> {
    let value = to_value(document);
    let indent = " ".repeat(indent);
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(buffer).map_err(|e| anyhow::Error::from(e).context("export produced invalid UTF-8").into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::GlobalSettings;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    fn sample() -> ConfigDocument {
        let mut global = GlobalSettings::default();
        global.set("ver", json!(7));
        global.set("captureDir", json!("/var/tr"));
        global.set("tempDir", json!(""));
        ConfigDocument {
            global,
            sources: vec![Entity::new(
                SchemaKind::Source,
                object(json!({"driver": "osmosdr", "device": "", "center": 851000000})),
            )],
            systems: vec![Entity::new(
                SchemaKind::System,
                object(json!({"shortName": "a", "type": "p25", "control_channels": [851000000, null]})),
            )],
            plugins: vec![],
        }
    }

    #[test]
    fn test_version_forced_and_first() {
        let value = to_value(&sample());
        let root = value.as_object().unwrap();
        assert_eq!(root.keys().next().map(String::as_str), Some("ver"));
        assert_eq!(root["ver"], json!(2));
    }

    #[test]
    fn test_empty_members_dropped() {
        let value = to_value(&sample());
        assert!(value.get("tempDir").is_none());
        assert_eq!(value["captureDir"], json!("/var/tr"));
        assert!(value["sources"][0].get("device").is_none());
        assert_eq!(value["systems"][0]["control_channels"], json!([851000000]));
    }

    #[test]
    fn test_plugins_omitted_when_empty() {
        let value = to_value(&sample());
        assert!(value.get("plugins").is_none());
        assert!(value["sources"].is_array());
    }

    #[test]
    fn test_identities_not_written() {
        let doc = sample();
        let text = to_json_string(&doc).unwrap();
        assert!(!text.contains(&doc.sources[0].id().to_string()));
    }

    #[test]
    fn test_four_space_indent() {
        let text = to_json_string(&sample()).unwrap();
        assert!(text.starts_with("{\n    \"ver\": 2,"));
        let two = to_json_string_with_indent(&sample(), 2).unwrap();
        assert!(two.starts_with("{\n  \"ver\": 2,"));
    }

    #[test]
    fn test_strip_empty_nested() {
        let stripped = strip_empty(json!({"a": {"b": "", "c": null, "d": [null, "", 1]}})).unwrap();
        assert_eq!(stripped, json!({"a": {"d": ["", 1]}}));
    }
}
