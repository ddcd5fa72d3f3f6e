//! Applicability and requiredness conditions
//!
//! Conditions are evaluated against the owning record only, never across
//! records. A list of conditions is a conjunction; the empty list holds.

use serde_json::Value;

use crate::document::RecordView;
use crate::schema::{Condition, Operator, Requirement};

/// Whether a value counts as absent: missing, `null`, or the empty string
pub fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Strict equality: same JSON type and same value, numbers compared numerically
///
/// A missing sibling never equals anything, not even `null`.
pub fn strict_equals(actual: Option<&Value>, expected: &Value) -> bool {
    match (actual, expected) {
        (None, _) => false,
        (Some(Value::Number(a)), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
        (Some(actual), expected) => actual == expected,
    }
}

fn list_contains(list: &[Value], actual: Option<&Value>) -> bool {
    list.iter().any(|candidate| strict_equals(actual, candidate))
}

/// Evaluate a single condition against a record
pub fn evaluate_one<R: RecordView + ?Sized>(condition: &Condition, record: &R) -> bool {
    let actual = record.lookup(&condition.field);
    let expected = condition.value.as_ref();

    match condition.operator {
        Operator::Eq => expected.is_some_and(|v| strict_equals(actual, v)),
        Operator::Neq => !expected.is_some_and(|v| strict_equals(actual, v)),
        // `in` with a non-list comparison value never holds
        Operator::In => match expected {
            Some(Value::Array(list)) => list_contains(list, actual),
            _ => false,
        },
        // `notIn` with a non-list comparison value always holds
        Operator::NotIn => match expected {
            Some(Value::Array(list)) => !list_contains(list, actual),
            _ => true,
        },
        Operator::Exists => !is_absent(actual),
        Operator::NotExists => is_absent(actual),
    }
}

/// Evaluate a conjunction of conditions against a record
pub fn evaluate<R: RecordView + ?Sized>(conditions: &[Condition], record: &R) -> bool {
    conditions.iter().all(|c| evaluate_one(c, record))
}

/// Resolve a field's requirement against its owning record
pub fn is_required<R: RecordView + ?Sized>(requirement: &Requirement, record: &R) -> bool {
    match requirement {
        Requirement::Always(required) => *required,
        Requirement::WhenConditionsHold(conditions) => evaluate(conditions, record),
    }
}
