//! Single-field validation
//!
//! Checks one value against its field definition: applicability, then
//! requiredness, then type and constraints. Each field yields at most one
//! finding, and the first failing check wins.
//!
//! Copyright (c) 2025 Trunkcfg Team
//! Licensed under the Apache-2.0 license

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use regex::Regex;
use serde_json::{Map, Value};
use tracing::warn;

use super::conditions::{evaluate, is_absent, is_required};
use super::path;
use super::ValidationError;
use crate::document::RecordView;
use crate::schema::{
    ArrayConstraints, ArrayItems, FieldDefinition, FieldKind, NumberConstraints, OptionValue,
    SelectOption, StringConstraints,
};

/// Message used when a field carries a value its conditions rule out
pub const INAPPLICABLE_MESSAGE: &str = "This option is not valid in this context";

/// JSON type name of a value, used in type mismatch messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validate one field value against its definition
///
/// `record` is the owning record, used to resolve conditions. Messages are
/// prefixed with the field label; the caller adds record context.
pub fn validate_field<R: RecordView + ?Sized>(
    definition: &FieldDefinition,
    value: Option<&Value>,
    record: &R,
    path: &str,
) -> Option<ValidationError> {
    validate_field_in_context(definition, value, record, path, INAPPLICABLE_MESSAGE)
}

/// Like [`validate_field`], with a caller-supplied inapplicable-value message
pub fn validate_field_in_context<R: RecordView + ?Sized>(
    definition: &FieldDefinition,
    value: Option<&Value>,
    record: &R,
    path: &str,
    inapplicable: &str,
) -> Option<ValidationError> {
    let label = &definition.label;

    if !evaluate(&definition.conditions, record) {
        if is_absent(value) {
            return None;
        }
        return Some(ValidationError::warning(path, format!("{}: {}", label, inapplicable)));
    }

    let value = match value {
        Some(v) if !is_unset(&definition.kind, v) => v,
        _ => {
            if is_required(&definition.required, record) {
                return Some(
                    ValidationError::error(path, format!("{}: Required", label))
                        .with_expected(definition.kind.type_name()),
                );
            }
            return None;
        }
    };

    let finding = match &definition.kind {
        FieldKind::String(constraints) => check_string(constraints, value),
        FieldKind::Number(constraints) | FieldKind::Frequency(constraints) => {
            check_number(constraints, value)
        }
        FieldKind::Boolean => check_type(value, "boolean", Value::is_boolean),
        FieldKind::Select { options } => check_select(options, value),
        FieldKind::Array(constraints) => return check_array(definition, constraints, value, path),
        FieldKind::Object { properties } => {
            return check_object(definition, properties.as_deref(), value, path)
        }
    };

    finding.map(|violation| violation.into_error(path, label))
}

/// Whether a present value counts as unset for requiredness
///
/// The empty string only means "unset" for string fields; anywhere else it
/// is a value of the wrong type.
fn is_unset(kind: &FieldKind, value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(_) => matches!(kind, FieldKind::String(_)) && is_absent(Some(value)),
        _ => false,
    }
}

/// Compiled field pattern, or `None` when it does not compile
///
/// Each distinct pattern is compiled once per process.
fn compiled_pattern(pattern: &str) -> Option<Regex> {
    static PATTERNS: OnceLock<Mutex<HashMap<String, Option<Regex>>>> = OnceLock::new();

    let cache = PATTERNS.get_or_init(|| Mutex::new(HashMap::new()));
    let mut cache = cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    cache
        .entry(pattern.to_string())
        .or_insert_with(|| match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "Skipping invalid field pattern");
                None
            }
        })
        .clone()
}

/// A failed check before it is attached to a path
struct Violation {
    message: String,
    expected: Option<String>,
    actual: Option<String>,
}

impl Violation {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    fn expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    fn actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }

    fn into_error(self, path: &str, label: &str) -> ValidationError {
        ValidationError {
            path: path.to_string(),
            message: format!("{}: {}", label, self.message),
            expected: self.expected,
            actual: self.actual,
            severity: crate::Severity::Error,
        }
    }
}

fn type_mismatch(expected: &str, value: &Value) -> Violation {
    let actual = json_type_name(value);
    Violation::new(format!("Expected {}, received {}", expected, actual))
        .expected(expected)
        .actual(actual)
}

fn check_type(value: &Value, expected: &str, predicate: fn(&Value) -> bool) -> Option<Violation> {
    (!predicate(value)).then(|| type_mismatch(expected, value))
}

fn check_string(constraints: &StringConstraints, value: &Value) -> Option<Violation> {
    let Some(text) = value.as_str() else {
        return Some(type_mismatch("string", value));
    };
    let length = text.chars().count();

    if let Some(min) = constraints.min_length {
        if length < min {
            return Some(
                Violation::new(format!("Must contain at least {} character(s)", min))
                    .expected(format!(">= {} characters", min))
                    .actual(format!("{} characters", length)),
            );
        }
    }

    if let Some(max) = constraints.max_length {
        if length > max {
            return Some(
                Violation::new(format!("Must contain at most {} character(s)", max))
                    .expected(format!("<= {} characters", max))
                    .actual(format!("{} characters", length)),
            );
        }
    }

    if let Some(pattern) = &constraints.pattern {
        if compiled_pattern(pattern).is_some_and(|re| !re.is_match(text)) {
            return Some(Violation::new("Invalid format").expected(pattern.clone()).actual(text));
        }
    }

    None
}

fn check_number(constraints: &NumberConstraints, value: &Value) -> Option<Violation> {
    let Some(number) = value.as_f64() else {
        return Some(type_mismatch("number", value));
    };

    if let Some(min) = constraints.min {
        if number < min {
            return Some(
                Violation::new(format!("Must be greater than or equal to {}", min))
                    .expected(format!(">= {}", min))
                    .actual(number.to_string()),
            );
        }
    }

    if let Some(max) = constraints.max {
        if number > max {
            return Some(
                Violation::new(format!("Must be less than or equal to {}", max))
                    .expected(format!("<= {}", max))
                    .actual(number.to_string()),
            );
        }
    }

    None
}

fn check_select(options: &[SelectOption], value: &Value) -> Option<Violation> {
    let all_text = options.iter().all(|o| matches!(o.value, OptionValue::Text(_)));
    let all_numeric = options.iter().all(|o| matches!(o.value, OptionValue::Number(_)));

    // Empty or mixed option sets leave the value unconstrained
    if options.is_empty() || !(all_text || all_numeric) {
        return None;
    }

    if options.iter().any(|o| o.value.matches(value)) {
        return None;
    }

    let allowed: Vec<String> = options.iter().map(|o| format!("'{}'", o.value)).collect();
    let allowed = allowed.join(" | ");
    Some(
        Violation::new(format!("Invalid option: expected one of {}", allowed))
            .expected(allowed)
            .actual(value.to_string()),
    )
}

fn check_item_type(items: &ArrayItems, item: &Value) -> Option<Violation> {
    match items {
        ArrayItems::Any | ArrayItems::Object(_) => None,
        ArrayItems::String => check_type(item, "string", Value::is_string),
        ArrayItems::Number | ArrayItems::Frequency => check_type(item, "number", Value::is_number),
        ArrayItems::Boolean => check_type(item, "boolean", Value::is_boolean),
    }
}

fn check_array(
    definition: &FieldDefinition,
    constraints: &ArrayConstraints,
    value: &Value,
    path: &str,
) -> Option<ValidationError> {
    let label = &definition.label;
    let Some(items) = value.as_array() else {
        return Some(type_mismatch("array", value).into_error(path, label));
    };

    if let Some(min) = constraints.min_items {
        if items.len() < min {
            return Some(
                Violation::new(format!("Must contain at least {} item(s)", min))
                    .expected(format!(">= {} items", min))
                    .actual(format!("{} items", items.len()))
                    .into_error(path, label),
            );
        }
    }

    if let Some(max) = constraints.max_items {
        if items.len() > max {
            return Some(
                Violation::new(format!("Must contain at most {} item(s)", max))
                    .expected(format!("<= {} items", max))
                    .actual(format!("{} items", items.len()))
                    .into_error(path, label),
            );
        }
    }

    if let ArrayItems::Object(item_fields) = &constraints.items {
        let mut first_warning = None;
        for (index, item) in items.iter().enumerate() {
            let Some(object) = item.as_object() else {
                let item_path = format!("{}[{}]", path, index);
                let violation = type_mismatch("object", item);
                return Some(ValidationError {
                    message: format!("{} item {}: {}", label, index + 1, violation.message),
                    ..violation.into_error(&item_path, label)
                });
            };
            match validate_properties(item_fields, object, |key| path::nested(path, index, key)) {
                Some(finding) if finding.is_error() => return Some(nested_error(finding, label, index)),
                Some(finding) => {
                    first_warning.get_or_insert_with(|| nested_error(finding, label, index));
                }
                None => {}
            }
        }
        return first_warning;
    }

    for (index, item) in items.iter().enumerate() {
        if let Some(violation) = check_item_type(&constraints.items, item) {
            let item_path = format!("{}[{}]", path, index);
            return Some(ValidationError {
                message: format!("{} item {}: {}", label, index + 1, violation.message),
                ..violation.into_error(&item_path, label)
            });
        }
    }

    None
}

fn check_object(
    definition: &FieldDefinition,
    properties: Option<&[FieldDefinition]>,
    value: &Value,
    path: &str,
) -> Option<ValidationError> {
    let Some(object) = value.as_object() else {
        return Some(type_mismatch("object", value).into_error(path, &definition.label));
    };
    let properties = properties?;
    validate_properties(properties, object, |key| format!("{}.{}", path, key)).map(|finding| {
        ValidationError {
            message: format!("{} - {}", definition.label, finding.message),
            ..finding
        }
    })
}

/// Validate declared properties of one object, using it as the condition
/// context; returns the first error, else the first warning
fn validate_properties(
    fields: &[FieldDefinition],
    object: &Map<String, Value>,
    child_path: impl Fn(&str) -> String,
) -> Option<ValidationError> {
    let mut first_warning = None;
    for field in fields {
        let key_path = child_path(&field.key);
        match validate_field(field, object.get(&field.key), object, &key_path) {
            Some(finding) if finding.is_error() => return Some(finding),
            Some(finding) => {
                first_warning.get_or_insert(finding);
            }
            None => {}
        }
    }
    first_warning
}

fn nested_error(finding: ValidationError, label: &str, index: usize) -> ValidationError {
    ValidationError {
        message: format!("{} item {} - {}", label, index + 1, finding.message),
        ..finding
    }
}
