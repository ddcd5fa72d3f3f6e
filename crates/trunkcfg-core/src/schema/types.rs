//! Field definition data model
//!
//! A field's behaviour is fully determined by its [`FieldKind`] tag plus the
//! constraint payload carried by that tag. Requiredness is either static or
//! resolved against the owning record through a list of [`Condition`]s.
//!
//! Copyright (c) 2025 Trunkcfg Team
//! Licensed under the Apache-2.0 license

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Hz per MHz, used by frequency display helpers
pub const HZ_PER_MHZ: f64 = 1_000_000.0;

/// Convert a frequency in Hz to MHz
pub fn hz_to_mhz(hz: f64) -> f64 {
    hz / HZ_PER_MHZ
}

/// Convert a frequency in MHz to Hz, rounded to the nearest whole Hz
pub fn mhz_to_hz(mhz: f64) -> f64 {
    (mhz * HZ_PER_MHZ).round()
}

/// The four entity kinds that own a schema section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    Global,
    Source,
    System,
    Plugin,
}

impl SchemaKind {
    /// Name of the document section holding records of this kind
    pub fn section_name(self) -> &'static str {
        match self {
            SchemaKind::Global => "global",
            SchemaKind::Source => "sources",
            SchemaKind::System => "systems",
            SchemaKind::Plugin => "plugins",
        }
    }

    /// Parse a schema kind from its singular name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "global" => Some(SchemaKind::Global),
            "source" => Some(SchemaKind::Source),
            "system" => Some(SchemaKind::System),
            "plugin" => Some(SchemaKind::Plugin),
            _ => None,
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaKind::Global => write!(f, "global"),
            SchemaKind::Source => write!(f, "source"),
            SchemaKind::System => write!(f, "system"),
            SchemaKind::Plugin => write!(f, "plugin"),
        }
    }
}

/// Comparison operator of a [`Condition`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    Eq,
    Neq,
    In,
    NotIn,
    Exists,
    NotExists,
}

/// Predicate over a sibling field of the same record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    /// Sibling key, looked up verbatim (no path traversal)
    pub field: String,
    pub operator: Operator,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Condition {
    fn new(field: impl Into<String>, operator: Operator, value: Option<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Eq, Some(value.into()))
    }

    pub fn neq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Neq, Some(value.into()))
    }

    pub fn is_in<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        let list = values.into_iter().map(Into::into).collect();
        Self::new(field, Operator::In, Some(Value::Array(list)))
    }

    pub fn not_in<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        let list = values.into_iter().map(Into::into).collect();
        Self::new(field, Operator::NotIn, Some(Value::Array(list)))
    }

    pub fn exists(field: impl Into<String>) -> Self {
        Self::new(field, Operator::Exists, None)
    }

    pub fn not_exists(field: impl Into<String>) -> Self {
        Self::new(field, Operator::NotExists, None)
    }

    /// Build a condition with an arbitrary comparison value
    ///
    /// Used for `in`/`notIn` conditions whose value is not a list, which the
    /// evaluator treats as vacuous.
    pub fn with_value(field: impl Into<String>, operator: Operator, value: Option<Value>) -> Self {
        Self::new(field, operator, value)
    }
}

/// Whether a field must carry a value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Requirement {
    /// Statically required or optional
    Always(bool),
    /// Required only while every condition holds against the owning record
    WhenConditionsHold(Vec<Condition>),
}

impl Default for Requirement {
    fn default() -> Self {
        Requirement::Always(false)
    }
}

/// Value of a select option
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Text(String),
    Number(f64),
}

impl OptionValue {
    /// Compare against a JSON value of the same type
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (OptionValue::Text(expected), Value::String(actual)) => expected == actual,
            (OptionValue::Number(expected), Value::Number(actual)) => {
                actual.as_f64().is_some_and(|n| n == *expected)
            }
            _ => false,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Text(s) => write!(f, "{}", s),
            OptionValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// One entry of a select field, in display order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub value: OptionValue,
    pub label: String,
}

/// Numeric constraints shared by `number` and `frequency`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NumberConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

/// String constraints
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StringConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// Element type of an array field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ArrayItems {
    /// Elements are not checked
    Any,
    String,
    Number,
    Frequency,
    Boolean,
    /// Objects validated field by field against an item schema
    Object(Vec<FieldDefinition>),
}

/// Array constraints
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayConstraints {
    pub items: ArrayItems,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
}

/// Closed set of field types, each with its constraint payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldKind {
    String(StringConstraints),
    Number(NumberConstraints),
    /// A number measured in Hz, displayed in MHz
    Frequency(NumberConstraints),
    Boolean,
    Select { options: Vec<SelectOption> },
    Array(ArrayConstraints),
    /// Object with declared properties, or an unconstrained map when `None`
    Object { properties: Option<Vec<FieldDefinition>> },
}

impl FieldKind {
    /// Short type name used in messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::String(_) => "string",
            FieldKind::Number(_) => "number",
            FieldKind::Frequency(_) => "frequency",
            FieldKind::Boolean => "boolean",
            FieldKind::Select { .. } => "select",
            FieldKind::Array(_) => "array",
            FieldKind::Object { .. } => "object",
        }
    }
}

/// Static description of one configurable field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub key: String,
    pub label: String,
    pub description: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub required: Requirement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// All must hold for the field to be applicable
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub advanced: bool,
}

impl FieldDefinition {
    fn with_kind(
        key: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
        kind: FieldKind,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            description: description.into(),
            kind,
            required: Requirement::default(),
            default: None,
            placeholder: None,
            conditions: Vec::new(),
            group: None,
            advanced: false,
        }
    }

    pub fn string(key: impl Into<String>, label: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_kind(key, label, description, FieldKind::String(StringConstraints::default()))
    }

    pub fn number(key: impl Into<String>, label: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_kind(key, label, description, FieldKind::Number(NumberConstraints::default()))
    }

    pub fn frequency(key: impl Into<String>, label: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_kind(key, label, description, FieldKind::Frequency(NumberConstraints::default()))
    }

    pub fn boolean(key: impl Into<String>, label: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_kind(key, label, description, FieldKind::Boolean)
    }

    /// Select over string options given as `(value, label)` pairs
    pub fn select(
        key: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
        options: &[(&str, &str)],
    ) -> Self {
        let options = options
            .iter()
            .map(|(value, label)| SelectOption {
                value: OptionValue::Text((*value).to_string()),
                label: (*label).to_string(),
            })
            .collect();
        Self::with_kind(key, label, description, FieldKind::Select { options })
    }

    /// Select with explicit option values
    pub fn select_options(
        key: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self::with_kind(key, label, description, FieldKind::Select { options })
    }

    pub fn array(
        key: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
        items: ArrayItems,
    ) -> Self {
        let constraints = ArrayConstraints {
            items,
            min_items: None,
            max_items: None,
        };
        Self::with_kind(key, label, description, FieldKind::Array(constraints))
    }

    pub fn object(
        key: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
        properties: Option<Vec<FieldDefinition>>,
    ) -> Self {
        Self::with_kind(key, label, description, FieldKind::Object { properties })
    }

    /// Mark the field as statically required
    pub fn required(mut self) -> Self {
        self.required = Requirement::Always(true);
        self
    }

    /// Mark the field as required while all `conditions` hold
    pub fn required_when(mut self, conditions: Vec<Condition>) -> Self {
        self.required = Requirement::WhenConditionsHold(conditions);
        self
    }

    /// Add an applicability condition
    pub fn when(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn advanced(mut self) -> Self {
        self.advanced = true;
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        if let FieldKind::Number(c) | FieldKind::Frequency(c) = &mut self.kind {
            c.min = Some(min);
        }
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        if let FieldKind::Number(c) | FieldKind::Frequency(c) = &mut self.kind {
            c.max = Some(max);
        }
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        if let FieldKind::Number(c) | FieldKind::Frequency(c) = &mut self.kind {
            c.step = Some(step);
        }
        self
    }

    pub fn min_length(mut self, len: usize) -> Self {
        if let FieldKind::String(c) = &mut self.kind {
            c.min_length = Some(len);
        }
        self
    }

    pub fn max_length(mut self, len: usize) -> Self {
        if let FieldKind::String(c) = &mut self.kind {
            c.max_length = Some(len);
        }
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        if let FieldKind::String(c) = &mut self.kind {
            c.pattern = Some(pattern.into());
        }
        self
    }

    pub fn min_items(mut self, count: usize) -> Self {
        if let FieldKind::Array(c) = &mut self.kind {
            c.min_items = Some(count);
        }
        self
    }

    pub fn max_items(mut self, count: usize) -> Self {
        if let FieldKind::Array(c) = &mut self.kind {
            c.max_items = Some(count);
        }
        self
    }

    /// Whether the field is statically required
    pub fn is_always_required(&self) -> bool {
        matches!(self.required, Requirement::Always(true))
    }

    /// Render a stored value for display, converting frequencies to MHz
    pub fn display_value(&self, value: &Value) -> String {
        match (&self.kind, value) {
            (FieldKind::Frequency(_), Value::Number(n)) => match n.as_f64() {
                Some(hz) => format!("{} MHz", hz_to_mhz(hz)),
                None => n.to_string(),
            },
            (_, Value::String(s)) => s.clone(),
            (_, other) => other.to_string(),
        }
    }
}

/// Ordered field list for one entity kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSection {
    pub id: String,
    pub title: String,
    pub description: String,
    pub fields: Vec<FieldDefinition>,
    /// Static values a freshly created record starts with
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub creation_template: Map<String, Value>,
}

impl SchemaSection {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        fields: Vec<FieldDefinition>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            fields,
            creation_template: Map::new(),
        }
    }

    pub fn with_creation_template(mut self, template: Map<String, Value>) -> Self {
        self.creation_template = template;
        self
    }

    /// Look up a field by key
    pub fn field(&self, key: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Whether `key` is declared by this section
    pub fn declares(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    /// Declared keys in schema order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.key.as_str())
    }

    /// Derive a section that extends this one with additional fields
    pub fn extend(
        &self,
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        additional: Vec<FieldDefinition>,
    ) -> Self {
        let mut fields = self.fields.clone();
        fields.extend(additional);
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            fields,
            creation_template: self.creation_template.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_sets_number_constraints() {
        let field = FieldDefinition::number("gain", "RF Gain", "").min(0.0).max(100.0);
        match field.kind {
            FieldKind::Number(c) => {
                assert_eq!(c.min, Some(0.0));
                assert_eq!(c.max, Some(100.0));
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_constraint_builders_ignore_other_kinds() {
        let field = FieldDefinition::boolean("agc", "AGC", "").min(3.0).pattern("x");
        assert_eq!(field.kind, FieldKind::Boolean);
    }

    #[test]
    fn test_option_value_matching_is_type_homogeneous() {
        let text = OptionValue::Text("2".into());
        let number = OptionValue::Number(2.0);
        assert!(text.matches(&json!("2")));
        assert!(!text.matches(&json!(2)));
        assert!(number.matches(&json!(2)));
        assert!(number.matches(&json!(2.0)));
        assert!(!number.matches(&json!("2")));
    }

    #[test]
    fn test_frequency_display() {
        let field = FieldDefinition::frequency("center", "Center", "");
        assert_eq!(field.display_value(&json!(851_012_500)), "851.0125 MHz");
        assert_eq!(mhz_to_hz(851.0125), 851_012_500.0);
    }

    #[test]
    fn test_field_definition_serializes_type_tag() {
        let field = FieldDefinition::string("shortName", "Short Name", "").max_length(16);
        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(value["type"], "string");
        assert_eq!(value["maxLength"], 16);
        assert_eq!(value["required"], false);
    }

    #[test]
    fn test_extend_appends_fields() {
        let base = SchemaSection::new("plugin", "Plugin", "", vec![FieldDefinition::string("name", "Name", "")]);
        let ext = base.extend("plugin_x", "X", "", vec![FieldDefinition::string("server", "Server", "")]);
        assert_eq!(ext.keys().collect::<Vec<_>>(), vec!["name", "server"]);
        assert!(!base.declares("server"));
    }
}
