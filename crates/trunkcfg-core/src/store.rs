//! Editing store
//!
//! `ConfigStore` is the single owner of the live document together with the
//! editing state around it: dirty flag, last validation findings, current
//! selection and the advanced-field toggle. Callers pass it explicitly to
//! whatever needs to read or replace the document.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::document::{ConfigDocument, Entity, EntityId, RecordView};
use crate::schema::{self, system, FieldDefinition, SchemaKind, SchemaSection};
use crate::validation::{self, evaluate, parse_path, ValidationError, ValidationSummary};
use crate::{Error, Result};

/// Fields an editor should show for a record
///
/// A field is visible when its conditions hold and it is not hidden behind
/// the advanced toggle.
pub fn visible_fields<'a, R: RecordView + ?Sized>(
    section: &'a SchemaSection,
    record: &R,
    show_advanced: bool,
) -> Vec<&'a FieldDefinition> {
    section
        .fields
        .iter()
        .filter(|field| show_advanced || !field.advanced)
        .filter(|field| evaluate(&field.conditions, record))
        .collect()
}

/// What the editor currently points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub section: SchemaKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<EntityId>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            section: SchemaKind::Global,
            item: None,
        }
    }
}

/// Owner of the live document and its editing state
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    document: ConfigDocument,
    dirty: bool,
    findings: Vec<ValidationError>,
    selection: Selection,
    show_advanced: bool,
}

impl ConfigStore {
    /// Store holding the default empty document
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    /// Replace the document wholesale
    pub fn set_document(&mut self, document: ConfigDocument) {
        self.document = document;
        self.dirty = false;
        self.findings.clear();
    }

    /// Back to the default empty document
    pub fn reset(&mut self) {
        self.document = ConfigDocument::default();
        self.dirty = false;
        self.findings.clear();
        self.selection.item = None;
    }

    /// Set one global value; `null` removes it
    pub fn update_global(&mut self, key: impl Into<String>, value: Value) {
        self.document.global.set(key, value);
        self.dirty = true;
    }

    pub fn add_source(&mut self) -> EntityId {
        self.add_entity(SchemaKind::Source)
    }

    pub fn add_system(&mut self) -> EntityId {
        self.add_entity(SchemaKind::System)
    }

    pub fn add_plugin(&mut self) -> EntityId {
        self.add_entity(SchemaKind::Plugin)
    }

    fn add_entity(&mut self, kind: SchemaKind) -> EntityId {
        let mut fields = schema::schema(kind).creation_template.clone();
        if kind == SchemaKind::System {
            let short_name = format!("sys{}", self.document.systems.len() + 1);
            fields.insert(system::SHORT_NAME_KEY.to_string(), Value::String(short_name));
        }

        let entity = Entity::new(kind, fields);
        let id = entity.id();
        if let Some(records) = self.document.entities_mut(kind) {
            records.push(entity);
        }

        debug!(kind = %kind, id = %id, "Added record");
        self.dirty = true;
        self.selection = Selection {
            section: kind,
            item: Some(id),
        };
        id
    }

    pub fn update_source(&mut self, id: EntityId, patch: &Map<String, Value>) -> Result<()> {
        self.update_entity(SchemaKind::Source, id, patch)
    }

    pub fn update_system(&mut self, id: EntityId, patch: &Map<String, Value>) -> Result<()> {
        self.update_entity(SchemaKind::System, id, patch)
    }

    pub fn update_plugin(&mut self, id: EntityId, patch: &Map<String, Value>) -> Result<()> {
        self.update_entity(SchemaKind::Plugin, id, patch)
    }

    /// Merge a patch into one record; `null` values remove keys
    pub fn update_entity(&mut self, kind: SchemaKind, id: EntityId, patch: &Map<String, Value>) -> Result<()> {
        let entity = self
            .document
            .entities_mut(kind)
            .and_then(|records| records.iter_mut().find(|e| e.id() == id))
            .ok_or(Error::EntityNotFound { kind, id })?;
        entity.apply_patch(patch);
        self.dirty = true;
        Ok(())
    }

    pub fn remove_source(&mut self, id: EntityId) -> Result<Entity> {
        self.remove_entity(SchemaKind::Source, id)
    }

    pub fn remove_system(&mut self, id: EntityId) -> Result<Entity> {
        self.remove_entity(SchemaKind::System, id)
    }

    pub fn remove_plugin(&mut self, id: EntityId) -> Result<Entity> {
        self.remove_entity(SchemaKind::Plugin, id)
    }

    /// Remove one record, clearing the selection if it pointed there
    pub fn remove_entity(&mut self, kind: SchemaKind, id: EntityId) -> Result<Entity> {
        let position = self
            .document
            .position(kind, id)
            .ok_or(Error::EntityNotFound { kind, id })?;
        let records = self
            .document
            .entities_mut(kind)
            .ok_or(Error::EntityNotFound { kind, id })?;
        let removed = records.remove(position);

        if self.selection.item == Some(id) {
            self.selection.item = None;
        }
        self.dirty = true;
        Ok(removed)
    }

    pub fn reorder_sources(&mut self, from: usize, to: usize) -> bool {
        self.reorder(SchemaKind::Source, from, to)
    }

    pub fn reorder_systems(&mut self, from: usize, to: usize) -> bool {
        self.reorder(SchemaKind::System, from, to)
    }

    /// Move a record from one position to another
    ///
    /// Returns `false` and leaves the document alone when `from` is out of
    /// range. A `to` past the end moves the record last.
    pub fn reorder(&mut self, kind: SchemaKind, from: usize, to: usize) -> bool {
        let Some(records) = self.document.entities_mut(kind) else {
            return false;
        };
        if from >= records.len() {
            return false;
        }
        let entity = records.remove(from);
        let to = to.min(records.len());
        records.insert(to, entity);
        self.dirty = true;
        true
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the document as saved
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Validate the live document and keep the findings
    pub fn validate(&mut self) -> &[ValidationError] {
        self.findings = validation::validate_document(&self.document);
        &self.findings
    }

    /// Findings from the last `validate` call
    pub fn findings(&self) -> &[ValidationError] {
        &self.findings
    }

    pub fn clear_findings(&mut self) {
        self.findings.clear();
    }

    pub fn summary(&self) -> ValidationSummary {
        ValidationSummary::from_findings(&self.findings)
    }

    pub fn error_count(&self) -> usize {
        self.summary().errors
    }

    pub fn warning_count(&self) -> usize {
        self.summary().warnings
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Switch section, clearing the selected item
    pub fn select_section(&mut self, section: SchemaKind) {
        self.selection = Selection { section, item: None };
    }

    pub fn select_item(&mut self, item: Option<EntityId>) {
        self.selection.item = item;
    }

    pub fn show_advanced(&self) -> bool {
        self.show_advanced
    }

    pub fn set_show_advanced(&mut self, show: bool) {
        self.show_advanced = show;
    }

    /// Select whatever a finding path points at
    ///
    /// The item is only selected when the path's index resolves to a record
    /// in the current document. Returns the new selection, or `None` for an
    /// empty path.
    pub fn navigate_to(&mut self, path: &str) -> Option<Selection> {
        let location = parse_path(path)?;
        let item = location
            .index
            .and_then(|index| self.document.entities(location.section).get(index))
            .map(Entity::id);
        self.selection = Selection {
            section: location.section,
            item,
        };
        Some(self.selection)
    }

    /// Human-readable breadcrumb for a finding path
    pub fn describe_path(&self, path: &str) -> String {
        let Some(location) = parse_path(path) else {
            return path.to_string();
        };
        let trail = field_trail(path);

        if location.section == SchemaKind::Global {
            return match trail {
                Some(trail) => format!("Global Settings → {}", trail),
                None => "Global Settings".to_string(),
            };
        }

        let Some(index) = location.index else {
            return section_title(location.section).to_string();
        };
        let record = self.document.entities(location.section).get(index);
        let name = record_name(location.section, index, record);
        match trail {
            Some(trail) => format!("{} → {}", name, trail),
            None => name,
        }
    }
}

fn section_title(kind: SchemaKind) -> &'static str {
    match kind {
        SchemaKind::Global => "Global Settings",
        SchemaKind::Source => "Sources",
        SchemaKind::System => "Systems",
        SchemaKind::Plugin => "Plugins",
    }
}

fn record_name(kind: SchemaKind, index: usize, record: Option<&Entity>) -> String {
    let (title, detail_key) = match kind {
        SchemaKind::Source => ("Source", "driver"),
        SchemaKind::System => ("System", system::SHORT_NAME_KEY),
        _ => ("Plugin", schema::plugin::NAME_KEY),
    };
    let detail = record
        .and_then(|r| r.get_str(detail_key))
        .filter(|d| !d.is_empty());
    match detail {
        Some(detail) => format!("{} #{} ({})", title, index + 1, detail),
        None => format!("{} #{}", title, index + 1),
    }
}

/// Everything after the record part of a path, segments joined by arrows
fn field_trail(path: &str) -> Option<String> {
    let rest = match path.find("].") {
        Some(pos) => &path[pos + 2..],
        None if path.contains('[') => return None,
        None => path.strip_prefix("global.").unwrap_or(path),
    };
    if rest.is_empty() || rest == "global" || ["sources", "systems", "plugins"].contains(&rest) {
        return None;
    }
    Some(rest.split('.').collect::<Vec<_>>().join(" → "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patch(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_add_uses_creation_templates() {
        let mut store = ConfigStore::new();
        let source = store.add_source();
        let first = store.add_system();
        let second = store.add_system();

        let doc = store.document();
        assert_eq!(doc.find(SchemaKind::Source, source).unwrap().get("rate"), Some(&json!(2048000)));
        assert_eq!(doc.find(SchemaKind::System, first).unwrap().get_str("shortName"), Some("sys1"));
        assert_eq!(doc.find(SchemaKind::System, second).unwrap().get_str("shortName"), Some("sys2"));
        assert_eq!(store.selection().item, Some(second));
        assert_eq!(store.selection().section, SchemaKind::System);
        assert!(store.is_dirty());
    }

    #[test]
    fn test_update_and_remove_unknown_id() {
        let mut store = ConfigStore::new();
        let stranger = EntityId::new();
        assert!(matches!(
            store.update_source(stranger, &patch(json!({"gain": 1}))),
            Err(Error::EntityNotFound { .. })
        ));
        assert!(store.remove_system(stranger).is_err());
    }

    #[test]
    fn test_update_merges_patch() {
        let mut store = ConfigStore::new();
        let id = store.add_source();
        store.update_source(id, &patch(json!({"gain": 45, "digitalRecorders": null}))).unwrap();
        let source = store.document().find(SchemaKind::Source, id).unwrap();
        assert_eq!(source.get("gain"), Some(&json!(45)));
        assert!(source.get("digitalRecorders").is_none());
        assert_eq!(source.get_str("driver"), Some("osmosdr"));
    }

    #[test]
    fn test_remove_clears_selection() {
        let mut store = ConfigStore::new();
        let id = store.add_plugin();
        store.remove_plugin(id).unwrap();
        assert_eq!(store.selection().item, None);
        assert!(store.document().plugins.is_empty());
    }

    #[test]
    fn test_reorder() {
        let mut store = ConfigStore::new();
        let a = store.add_system();
        let b = store.add_system();
        assert!(store.reorder_systems(0, 1));
        let ids: Vec<_> = store.document().systems.iter().map(Entity::id).collect();
        assert_eq!(ids, vec![b, a]);
        assert!(!store.reorder_systems(5, 0));
    }

    #[test]
    fn test_set_document_clears_dirty_and_findings() {
        let mut store = ConfigStore::new();
        store.add_source();
        assert!(!store.validate().is_empty());
        store.set_document(ConfigDocument::default());
        assert!(!store.is_dirty());
        assert!(store.findings().is_empty());
    }

    #[test]
    fn test_validate_counts() {
        let mut store = ConfigStore::new();
        store.validate();
        assert_eq!(store.error_count(), 2);
        assert_eq!(store.warning_count(), 0);
        store.clear_findings();
        assert_eq!(store.error_count(), 0);
    }

    #[test]
    fn test_navigate_to_resolves_index() {
        let mut store = ConfigStore::new();
        store.add_system();
        let second = store.add_system();
        store.select_section(SchemaKind::Global);

        let selection = store.navigate_to("systems[1].shortName").unwrap();
        assert_eq!(selection.section, SchemaKind::System);
        assert_eq!(selection.item, Some(second));

        let selection = store.navigate_to("systems[9]").unwrap();
        assert_eq!(selection.item, None);

        let selection = store.navigate_to("audioStreaming").unwrap();
        assert_eq!(selection.section, SchemaKind::Global);
    }

    #[test]
    fn test_describe_path() {
        let mut store = ConfigStore::new();
        store.add_system();
        store.add_source();
        assert_eq!(store.describe_path("systems[0].shortName"), "System #1 (sys1) → shortName");
        assert_eq!(store.describe_path("sources[0]"), "Source #1 (osmosdr)");
        assert_eq!(store.describe_path("sources"), "Sources");
        assert_eq!(store.describe_path("ver"), "Global Settings → ver");
        assert_eq!(store.describe_path("global"), "Global Settings");
        assert_eq!(
            store.describe_path("plugins[2].streams[0].port"),
            "Plugin #3 → streams[0] → port"
        );
    }

    #[test]
    fn test_visible_fields_respect_conditions_and_advanced() {
        let section = schema::schema(SchemaKind::Source);
        let record = patch(json!({"driver": "usrp"}));
        let basic: Vec<&str> = visible_fields(section, &record, false).iter().map(|f| f.key.as_str()).collect();
        assert!(basic.contains(&"gain"));
        assert!(!basic.contains(&"antenna"));
        assert!(!basic.contains(&"iqfile"));

        let advanced: Vec<&str> = visible_fields(section, &record, true).iter().map(|f| f.key.as_str()).collect();
        assert!(advanced.contains(&"antenna"));
        assert!(!advanced.contains(&"ifGain"));
    }
}
