//! Shared test support utilities for integration tests

#![allow(dead_code)]

use serde_json::{json, Map, Value};
use trunkcfg_core::{ConfigDocument, Entity, GlobalSettings, SchemaKind};

/// Unwrap a `json!` object literal into a map
pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

/// An osmosdr source with every required field set
pub fn osmosdr_source() -> Entity {
    Entity::new(
        SchemaKind::Source,
        object(json!({
            "driver": "osmosdr",
            "center": 0,
            "rate": 2048000,
            "gain": 30
        })),
    )
}

/// A P25 system with one control channel
pub fn p25_system(short_name: &str) -> Entity {
    Entity::new(
        SchemaKind::System,
        object(json!({
            "shortName": short_name,
            "type": "p25",
            "control_channels": [851012500]
        })),
    )
}

/// A conventional system with no channel source at all
pub fn bare_conventional_system() -> Entity {
    Entity::new(
        SchemaKind::System,
        object(json!({
            "shortName": "conv",
            "type": "conventional",
            "squelch": -50
        })),
    )
}

/// A streaming plugin with one destination
pub fn simplestream_plugin() -> Entity {
    Entity::new(
        SchemaKind::Plugin,
        object(json!({
            "library": "libsimplestream.so",
            "name": "simplestream",
            "streams": [{"address": "127.0.0.1", "port": 9123, "TGID": 0}]
        })),
    )
}

/// Build a document with default global settings
pub fn document(sources: Vec<Entity>, systems: Vec<Entity>, plugins: Vec<Entity>) -> ConfigDocument {
    ConfigDocument {
        global: GlobalSettings::default(),
        sources,
        systems,
        plugins,
    }
}

/// A document that validates without errors
pub fn valid_document() -> ConfigDocument {
    document(vec![osmosdr_source()], vec![p25_system("metro")], vec![])
}

/// Wire-format text of a small valid document with extra, undeclared keys
pub fn sample_import_text() -> &'static str {
    r#"{
    "ver": 2,
    "captureDir": "/var/lib/trunk-recorder",
    "customGlobal": {"keep": true},
    "sources": [
        {"driver": "osmosdr", "center": 851000000, "rate": 2400000, "gain": 40, "vendorHint": "airspy"}
    ],
    "systems": [
        {"shortName": "metro", "type": "p25", "control_channels": [851012500, 851037500]}
    ]
}"#
}
