//! Property-based tests for validation and reconciliation
//!
//! These tests verify invariants that should hold for every document the
//! strategies can produce, not just hand-picked examples.

mod test_support;

use proptest::prelude::*;
use serde_json::{json, Map, Value};
use trunkcfg_core::document::GlobalSettings;
use trunkcfg_core::export;
use trunkcfg_core::import::{import_text, ImportReconciler};
use trunkcfg_core::validation::{evaluate, validate_field};
use trunkcfg_core::{registry, validate_document, ConfigDocument, ConfigStore, Entity, SchemaKind, Severity};

use test_support::object;

// Strategy functions for property testing

/// Strategy for source drivers, including ones the registry does not know
fn driver_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("osmosdr".to_string()),
        Just("usrp".to_string()),
        Just("sigmffile".to_string()),
        Just("iqfile".to_string()),
        "[a-z]{1,8}",
    ]
}

/// Strategy for system types across the trunked and conventional families
fn system_type_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("p25"),
        Just("smartnet"),
        Just("conventional"),
        Just("conventionalDMR"),
        Just("conventionalP25"),
    ]
}

/// Strategy for a present, non-empty value of any JSON type
fn present_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(Value::from),
        "[a-z]{1,6}".prop_map(Value::String),
        prop::collection::vec(0i64..10, 0..3).prop_map(|v| json!(v)),
    ]
}

fn source_strategy() -> impl Strategy<Value = Map<String, Value>> {
    (
        driver_strategy(),
        prop::option::of(-500i64..500),
        prop::option::of(-5i64..5),
        0i64..120,
    )
        .prop_map(|(driver, error, ppm, gain)| {
            let mut fields = object(json!({
                "driver": driver,
                "center": 851000000,
                "rate": 2048000,
                "gain": gain
            }));
            if let Some(error) = error {
                fields.insert("error".to_string(), json!(error));
            }
            if let Some(ppm) = ppm {
                fields.insert("ppm".to_string(), json!(ppm));
            }
            fields
        })
}

fn system_strategy() -> impl Strategy<Value = Map<String, Value>> {
    (
        prop::sample::select(vec!["alpha", "beta", "gamma"]),
        system_type_strategy(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(short_name, system_type, channels, channel_file)| {
            let mut fields = object(json!({
                "shortName": short_name,
                "type": system_type,
                "control_channels": [851012500]
            }));
            if channels {
                fields.insert("channels".to_string(), json!([460025000]));
            }
            if channel_file {
                fields.insert("channelFile".to_string(), json!("channels.csv"));
            }
            fields
        })
}

fn plugin_strategy() -> impl Strategy<Value = Map<String, Value>> {
    prop::sample::select(vec!["simplestream", "rdioscanner_uploader", "custom"]).prop_map(|name| {
        object(json!({
            "library": format!("lib{}.so", name),
            "name": name,
            "streams": [{"address": "127.0.0.1", "port": 9000, "TGID": 0}]
        }))
    })
}

fn document_strategy() -> impl Strategy<Value = ConfigDocument> {
    (
        prop::collection::vec(source_strategy(), 0..3),
        prop::collection::vec(system_strategy(), 0..4),
        prop::collection::vec(plugin_strategy(), 0..3),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(sources, systems, plugins, audio_streaming)| {
            let mut global = GlobalSettings::default();
            if let Some(flag) = audio_streaming {
                global.set("audioStreaming", json!(flag));
            }
            ConfigDocument {
                global,
                sources: sources.into_iter().map(|f| Entity::new(SchemaKind::Source, f)).collect(),
                systems: systems.into_iter().map(|f| Entity::new(SchemaKind::System, f)).collect(),
                plugins: plugins.into_iter().map(|f| Entity::new(SchemaKind::Plugin, f)).collect(),
            }
        })
}

proptest! {
    #[test]
    fn prop_inapplicable_absent_fields_are_silent(driver in driver_strategy()) {
        let record = object(json!({"driver": driver}));
        for field in &registry().source.fields {
            if !evaluate(&field.conditions, &record) {
                prop_assert!(validate_field(field, None, &record, "p").is_none());
            }
        }
    }

    #[test]
    fn prop_inapplicable_present_fields_warn_once(
        driver in driver_strategy(),
        value in present_value_strategy(),
    ) {
        let record = object(json!({"driver": driver}));
        for field in &registry().source.fields {
            if !evaluate(&field.conditions, &record) {
                let finding = validate_field(field, Some(&value), &record, "p");
                prop_assert!(matches!(finding, Some(ref f) if f.severity == Severity::Warning));
            }
        }
    }

    #[test]
    fn prop_required_absent_fields_error(system_type in system_type_strategy()) {
        let record = object(json!({"type": system_type}));
        for field in &registry().system.fields {
            if field.is_always_required() && evaluate(&field.conditions, &record) {
                let finding = validate_field(field, None, &record, "p");
                prop_assert!(matches!(finding, Some(ref f) if f.severity == Severity::Error));
            }
        }
    }

    #[test]
    fn prop_export_reimport_preserves_findings(doc in document_strategy()) {
        let text = export::to_json_string(&doc).unwrap();
        let result = import_text(&text);
        prop_assert!(result.success);
        let reimported = result.config.unwrap();
        prop_assert_eq!(validate_document(&doc), validate_document(&reimported));
    }

    #[test]
    fn prop_duplicate_short_names_reported_for_every_index(doc in document_strategy()) {
        let findings = validate_document(&doc);
        for (index, system) in doc.systems.iter().enumerate() {
            let name = system.get_str("shortName");
            let shared = doc.systems.iter().filter(|s| s.get_str("shortName") == name).count() > 1;
            let path = format!("systems[{}].shortName", index);
            let reported = findings.iter().any(|f| f.path == path && f.message.contains("Duplicate"));
            prop_assert_eq!(shared, reported);
        }
    }

    #[test]
    fn prop_conventional_channel_rule(doc in document_strategy()) {
        let findings = validate_document(&doc);
        for (index, system) in doc.systems.iter().enumerate() {
            let conventional = system.get_str("type").is_some_and(|t| t.starts_with("conventional"));
            let has_channels = system.get("channels").is_some();
            let has_file = system.get("channelFile").is_some();
            let path = format!("systems[{}]", index);
            let at_record: Vec<_> = findings.iter().filter(|f| f.path == path).collect();

            match (conventional, has_channels, has_file) {
                (true, false, false) => prop_assert!(at_record.iter().any(|f| f.severity == Severity::Error)),
                (true, true, true) => {
                    prop_assert!(at_record.iter().all(|f| f.severity == Severity::Warning));
                    prop_assert!(!at_record.is_empty());
                }
                _ => prop_assert!(at_record.is_empty()),
            }
        }
    }

    #[test]
    fn prop_truncated_import_never_mutates_store(doc in document_strategy(), cut in 0.0f64..1.0) {
        let text = export::to_json_string(&doc).unwrap();
        let end = ((text.len() - 1) as f64 * cut) as usize;
        let truncated = &text[..end];

        let mut store = ConfigStore::new();
        store.set_document(doc.clone());
        let mut reconciler = ImportReconciler::new();
        let result = reconciler.begin(truncated);

        prop_assert!(!result.success);
        prop_assert!(reconciler.accept(&mut store).is_err());
        prop_assert_eq!(store.document(), &doc);
    }
}
