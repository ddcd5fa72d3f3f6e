//! Integration tests for validation, import reconciliation and export
//!
//! These exercise the public API end to end: documents are built or
//! imported, validated, accepted into a store and exported again.

mod test_support;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use trunkcfg_core::export;
use trunkcfg_core::import::{import_text, ImportReconciler, ImportState};
use trunkcfg_core::{validate_document, ConfigStore, SchemaKind, Severity};

use test_support::*;

// ============================================================================
// VALIDATION SCENARIOS
// ============================================================================

#[test]
fn test_valid_document_has_no_errors() {
    let findings = validate_document(&valid_document());
    assert!(findings.iter().all(|f| f.severity == Severity::Warning), "{:?}", findings);
}

#[test]
fn test_conventional_without_channels_errors_at_record() {
    let doc = document(vec![osmosdr_source()], vec![bare_conventional_system()], vec![]);
    let findings = validate_document(&doc);
    assert!(findings
        .iter()
        .any(|f| f.path == "systems[0]" && f.severity == Severity::Error));
}

#[test]
fn test_streaming_plugin_without_flag_errors_once() {
    let doc = document(
        vec![osmosdr_source()],
        vec![p25_system("metro")],
        vec![simplestream_plugin(), simplestream_plugin()],
    );
    let at_flag: Vec<_> = validate_document(&doc)
        .into_iter()
        .filter(|f| f.path == "audioStreaming")
        .collect();
    assert_eq!(at_flag.len(), 1);
    assert_eq!(at_flag[0].severity, Severity::Error);
}

// ============================================================================
// IMPORT RECONCILIATION
// ============================================================================

#[test]
fn test_import_keeps_undeclared_keys() {
    let result = import_text(sample_import_text());
    assert!(result.success);
    let doc = result.config.expect("parsed document");

    assert!(doc.global.fields().is_extension("customGlobal"));
    assert_eq!(doc.global.get("customGlobal"), Some(&json!({"keep": true})));
    assert!(doc.sources[0].fields().is_extension("vendorHint"));
    assert_eq!(doc.sources[0].get("vendorHint"), Some(&json!("airspy")));
    assert!(!doc.sources[0].fields().is_extension("gain"));
}

#[test]
fn test_export_keeps_imported_member_order() {
    let text = r#"{"ver": 2, "sources": [{"custom": 1, "driver": "osmosdr", "center": 851000000}], "systems": []}"#;
    let doc = import_text(text).config.expect("parsed document");
    let exported = export::to_value(&doc);
    let keys: Vec<&str> = exported["sources"][0]
        .as_object()
        .expect("source object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["custom", "driver", "center"]);
}

#[test]
fn test_import_assigns_distinct_identities() {
    let text = r#"{"ver": 2, "sources": [{"driver": "osmosdr"}, {"driver": "osmosdr"}], "systems": [{"type": "p25"}]}"#;
    let doc = import_text(text).config.expect("parsed document");
    assert_ne!(doc.sources[0].id(), doc.sources[1].id());
    assert_ne!(doc.sources[0].id(), doc.systems[0].id());
}

#[test]
fn test_malformed_import_never_touches_store() {
    let mut store = ConfigStore::new();
    store.add_source();
    store.add_system();
    let before = store.document().clone();

    let mut reconciler = ImportReconciler::new();
    let result = reconciler.begin(r#"{"ver": 2, "sources": [{"driver": "osm"#);
    assert!(!result.success);
    assert_eq!(result.parse_errors.len(), 1);
    assert!(result.schema_warnings.is_empty());

    assert!(reconciler.accept(&mut store).is_err());
    assert_eq!(store.document(), &before);
    assert_eq!(reconciler.state(), ImportState::Reviewing);

    reconciler.cancel();
    assert_eq!(reconciler.state(), ImportState::Idle);
    assert_eq!(store.document(), &before);
}

#[test]
fn test_new_import_discards_pending_one() {
    let mut reconciler = ImportReconciler::new();
    reconciler.begin("{broken");
    reconciler.begin(sample_import_text());
    assert!(reconciler.pending().map(|r| r.success).unwrap_or(false));

    let mut store = ConfigStore::new();
    reconciler.accept(&mut store).expect("accept parsed import");
    assert_eq!(store.document().systems.len(), 1);
    assert!(!store.is_dirty());
}

#[test]
fn test_semantically_incomplete_import_can_be_accepted() {
    let mut reconciler = ImportReconciler::new();
    let result = reconciler.begin(r#"{"ver": 2, "sources": [], "systems": []}"#);
    assert!(result.success);
    assert!(!result.schema_warnings.is_empty());

    let mut store = ConfigStore::new();
    reconciler.accept(&mut store).expect("accept incomplete import");
    store.validate();
    assert_eq!(store.error_count(), 2);
}

// ============================================================================
// EXPORT
// ============================================================================

#[test]
fn test_export_import_round_trip_preserves_findings() {
    let doc = document(
        vec![osmosdr_source()],
        vec![p25_system("dup"), p25_system("dup"), bare_conventional_system()],
        vec![simplestream_plugin()],
    );
    let text = export::to_json_string(&doc).expect("export");
    let reimported = import_text(&text).config.expect("reimport");

    assert_eq!(validate_document(&doc), validate_document(&reimported));
}

#[test]
fn test_export_after_store_edits() {
    let mut store = ConfigStore::new();
    let source = store.add_source();
    store.add_system();
    store
        .update_source(source, &object(json!({"device": "", "ppm": 1})))
        .expect("update source");
    store.update_global("ver", json!(9));

    let text = export::to_json_string(store.document()).expect("export");
    let value: Value = serde_json::from_str(&text).expect("valid JSON");

    assert_eq!(value["ver"], json!(2));
    assert_eq!(value["sources"][0]["ppm"], json!(1));
    assert!(value["sources"][0].get("device").is_none());
    assert_eq!(value["systems"][0]["shortName"], json!("sys1"));
    assert!(value.get("plugins").is_none());
    assert!(!text.contains(&source.to_string()));
}

#[test]
fn test_navigation_from_findings() {
    let mut store = ConfigStore::new();
    store.set_document(document(
        vec![osmosdr_source()],
        vec![p25_system("a"), bare_conventional_system()],
        vec![],
    ));
    let path = store
        .validate()
        .iter()
        .find(|f| f.path.starts_with("systems[1]"))
        .map(|f| f.path.clone())
        .expect("finding on second system");

    let selection = store.navigate_to(&path).expect("navigable path");
    assert_eq!(selection.section, SchemaKind::System);
    assert_eq!(selection.item, Some(store.document().systems[1].id()));
}
