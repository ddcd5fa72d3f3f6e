//! Schema-driven validation of configuration documents
//!
//! Validation never stops at the first problem: every pass returns the full
//! list of findings, each tagged with a location path and a severity.
//!
//! The validator is organized into focused modules:
//! - `types`: the finding type
//! - `path`: building and parsing finding locations
//! - `conditions`: applicability and requiredness conditions
//! - `field_validators`: single-field type and constraint checks
//! - `rules`: invariants spanning several records
//! - `core`: `DocumentValidator` orchestration
//!
//! Copyright (c) 2025 Trunkcfg Team
//! Licensed under the Apache-2.0 license

pub mod types;
pub mod path;
pub mod conditions;
pub mod field_validators;
pub mod rules;
pub mod core;

// Re-export public API
pub use types::{ValidationError, ValidationSummary};
pub use path::{parse as parse_path, FindingLocation, Section};
pub use conditions::{evaluate, is_absent, is_required};
pub use field_validators::validate_field;
pub use core::{validate_document, DocumentValidator};
