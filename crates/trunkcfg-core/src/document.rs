//! Configuration document model
//!
//! Records keep the fields their schema declares apart from an open
//! extension bag holding every undeclared key. Both halves are plain JSON
//! values so that a structurally valid but semantically wrong document can be
//! held, edited and reported on without loss.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::schema::{self, global, plugin, SchemaKind, SchemaSection};

/// Read access to a record's fields by exact key
///
/// The condition evaluator and field validator only ever look fields up
/// through this trait, so top-level records and nested array items are
/// interchangeable as sibling-lookup contexts.
pub trait RecordView {
    fn lookup(&self, key: &str) -> Option<&Value>;
}

impl RecordView for Map<String, Value> {
    fn lookup(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

/// Opaque identity of a source, system or plugin record
///
/// Issued at creation and at import time. Never part of exported output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(Uuid);

impl EntityId {
    /// Issue a fresh identity
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Declared fields plus the extension bag for everything else
///
/// Members live in one map in insertion order; `extension_keys` marks the
/// ones the governing schema does not declare.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldBag {
    fields: Map<String, Value>,
    extension_keys: BTreeSet<String>,
}

impl FieldBag {
    /// Partition `fields` according to `schema`
    pub fn from_map(fields: Map<String, Value>, schema: &SchemaSection) -> Self {
        let mut bag = Self::default();
        for (key, value) in fields {
            bag.insert(key, value, schema);
        }
        bag
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Insert a value on the side of the bag `schema` assigns it to
    ///
    /// An existing key keeps its position.
    pub fn insert(&mut self, key: String, value: Value, schema: &SchemaSection) {
        if schema.declares(&key) {
            self.extension_keys.remove(&key);
        } else {
            self.extension_keys.insert(key.clone());
        }
        self.fields.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.extension_keys.remove(key);
        self.fields.shift_remove(key)
    }

    /// Re-partition after the governing schema changed
    pub fn rebalance(&mut self, schema: &SchemaSection) {
        self.extension_keys = self
            .fields
            .keys()
            .filter(|key| !schema.declares(key))
            .cloned()
            .collect();
    }

    /// Whether `key` is held in the extension bag
    pub fn is_extension(&self, key: &str) -> bool {
        self.extension_keys.contains(key)
    }

    /// Fields declared by the schema
    pub fn known(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter().filter(|(key, _)| !self.is_extension(key))
    }

    /// Fields the schema does not declare, kept verbatim
    pub fn extensions(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter().filter(|(key, _)| self.is_extension(key))
    }

    /// All members in their original order
    pub fn to_map(&self) -> Map<String, Value> {
        self.fields.clone()
    }
}

impl RecordView for FieldBag {
    fn lookup(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

/// One source, system or plugin record
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: EntityId,
    kind: SchemaKind,
    fields: FieldBag,
}

impl Entity {
    /// Build a record with a fresh identity
    pub fn new(kind: SchemaKind, fields: Map<String, Value>) -> Self {
        Self::with_id(EntityId::new(), kind, fields)
    }

    /// Build a record with a known identity
    pub fn with_id(id: EntityId, kind: SchemaKind, fields: Map<String, Value>) -> Self {
        let schema = governing_schema(kind, &fields);
        Self {
            id,
            kind,
            fields: FieldBag::from_map(fields, schema),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> SchemaKind {
        self.kind
    }

    /// The schema this record is validated against
    pub fn schema(&self) -> &'static SchemaSection {
        match self.kind {
            SchemaKind::Plugin => schema::registry().effective_plugin_schema(self.get_str(plugin::NAME_KEY)),
            kind => schema::schema(kind),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// String value of a field, if present and a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn fields(&self) -> &FieldBag {
        &self.fields
    }

    /// Apply a key/value patch; a `null` value removes the key
    pub fn apply_patch(&mut self, patch: &Map<String, Value>) {
        let schema = self.schema();
        for (key, value) in patch {
            if value.is_null() {
                self.fields.remove(key);
            } else {
                self.fields.insert(key.clone(), value.clone(), schema);
            }
        }
        if self.kind == SchemaKind::Plugin {
            let schema = self.schema();
            self.fields.rebalance(schema);
        }
    }

    /// All fields as one map, without the identity
    pub fn to_record(&self) -> Map<String, Value> {
        self.fields.to_map()
    }
}

impl RecordView for Entity {
    fn lookup(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

fn governing_schema(kind: SchemaKind, fields: &Map<String, Value>) -> &'static SchemaSection {
    match kind {
        SchemaKind::Plugin => {
            let name = fields.get(plugin::NAME_KEY).and_then(Value::as_str);
            schema::registry().effective_plugin_schema(name)
        }
        kind => schema::schema(kind),
    }
}

/// The global settings record
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalSettings {
    fields: FieldBag,
}

impl GlobalSettings {
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self {
            fields: FieldBag::from_map(fields, schema::schema(SchemaKind::Global)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Set a global value; `null` removes it
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if value.is_null() {
            self.fields.remove(&key);
        } else {
            self.fields.insert(key, value, schema::schema(SchemaKind::Global));
        }
    }

    /// Boolean flag value, `false` when absent or not a boolean
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn fields(&self) -> &FieldBag {
        &self.fields
    }

    pub fn to_map(&self) -> Map<String, Value> {
        self.fields.to_map()
    }
}

impl Default for GlobalSettings {
    fn default() -> Self {
        let mut fields = Map::new();
        fields.insert(global::VERSION_KEY.to_string(), Value::from(global::REQUIRED_VERSION));
        Self::from_map(fields)
    }
}

impl RecordView for GlobalSettings {
    fn lookup(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

/// One global settings record plus ordered source, system and plugin records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDocument {
    pub global: GlobalSettings,
    pub sources: Vec<Entity>,
    pub systems: Vec<Entity>,
    pub plugins: Vec<Entity>,
}

impl ConfigDocument {
    /// Records of one kind in document order (empty for `Global`)
    pub fn entities(&self, kind: SchemaKind) -> &[Entity] {
        match kind {
            SchemaKind::Global => &[],
            SchemaKind::Source => &self.sources,
            SchemaKind::System => &self.systems,
            SchemaKind::Plugin => &self.plugins,
        }
    }

    /// Mutable record list for an entity kind
    pub fn entities_mut(&mut self, kind: SchemaKind) -> Option<&mut Vec<Entity>> {
        match kind {
            SchemaKind::Global => None,
            SchemaKind::Source => Some(&mut self.sources),
            SchemaKind::System => Some(&mut self.systems),
            SchemaKind::Plugin => Some(&mut self.plugins),
        }
    }

    /// Find a record by identity
    pub fn find(&self, kind: SchemaKind, id: EntityId) -> Option<&Entity> {
        self.entities(kind).iter().find(|e| e.id() == id)
    }

    /// Position of a record by identity
    pub fn position(&self, kind: SchemaKind, id: EntityId) -> Option<usize> {
        self.entities(kind).iter().position(|e| e.id() == id)
    }
}
