//! Document validation orchestration
//!
//! `DocumentValidator` walks every schema field of every record, then runs the
//! document-level rules, and returns the complete list of findings.
//!
//! Copyright (c) 2025 Trunkcfg Team
//! Licensed under the Apache-2.0 license

use tracing::debug;

use super::field_validators::{validate_field_in_context, INAPPLICABLE_MESSAGE};
use super::rules::validate_document_rules;
use super::{path, ValidationError, ValidationSummary};
use crate::document::{ConfigDocument, Entity};
use crate::schema::{self, plugin, source, system, SchemaKind};

/// Validator over one configuration document
///
/// Validation is a pure function of the document: running it twice on the
/// same document yields the same findings in the same order.
pub struct DocumentValidator<'a> {
    document: &'a ConfigDocument,
}

impl<'a> DocumentValidator<'a> {
    pub fn new(document: &'a ConfigDocument) -> Self {
        Self { document }
    }

    /// Run every check and return all findings
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        errors.extend(self.validate_global());
        for kind in [SchemaKind::Source, SchemaKind::System, SchemaKind::Plugin] {
            errors.extend(self.validate_records(kind));
        }
        errors.extend(validate_document_rules(self.document));

        let summary = ValidationSummary::from_findings(&errors);
        debug!(errors = summary.errors, warnings = summary.warnings, "Validated document");
        errors
    }

    /// Validate the global settings record against the global schema
    pub fn validate_global(&self) -> Vec<ValidationError> {
        let global = &self.document.global;
        schema::schema(SchemaKind::Global)
            .fields
            .iter()
            .filter_map(|field| {
                validate_field_in_context(
                    field,
                    global.get(&field.key),
                    global,
                    &path::global_field(&field.key),
                    INAPPLICABLE_MESSAGE,
                )
            })
            .collect()
    }

    /// Validate every record of one kind
    pub fn validate_records(&self, kind: SchemaKind) -> Vec<ValidationError> {
        self.document
            .entities(kind)
            .iter()
            .enumerate()
            .flat_map(|(index, entity)| validate_record(entity, index))
            .collect()
    }
}

/// Validate one record against its effective schema
///
/// Extension-bag fields are carried but never validated.
pub fn validate_record(entity: &Entity, index: usize) -> Vec<ValidationError> {
    let kind = entity.kind();
    let prefix = record_prefix(entity, index);
    let inapplicable = inapplicable_message(entity);

    entity
        .schema()
        .fields
        .iter()
        .filter_map(|field| {
            validate_field_in_context(
                field,
                entity.get(&field.key),
                entity,
                &path::record_field(kind, index, &field.key),
                &inapplicable,
            )
        })
        .map(|finding| ValidationError {
            message: format!("{}{}", prefix, finding.message),
            ..finding
        })
        .collect()
}

fn record_prefix(entity: &Entity, index: usize) -> String {
    match entity.kind() {
        SchemaKind::Global => String::new(),
        SchemaKind::Source => format!("Source {} - ", index + 1),
        SchemaKind::System => format!(
            "System \"{}\" - ",
            entity.get_str(system::SHORT_NAME_KEY).unwrap_or("")
        ),
        SchemaKind::Plugin => format!("Plugin {} - ", index + 1),
    }
}

fn inapplicable_message(entity: &Entity) -> String {
    match entity.kind() {
        SchemaKind::Source => format!(
            "This option is not valid for driver \"{}\"",
            entity.get_str(source::DRIVER_KEY).unwrap_or("")
        ),
        SchemaKind::System => format!(
            "This option is not valid for {} systems",
            entity.get_str(system::TYPE_KEY).unwrap_or("")
        ),
        SchemaKind::Plugin => format!(
            "This option is not valid for plugin \"{}\"",
            entity.get_str(plugin::NAME_KEY).unwrap_or("")
        ),
        SchemaKind::Global => INAPPLICABLE_MESSAGE.to_string(),
    }
}

/// Validate a whole document
pub fn validate_document(document: &ConfigDocument) -> Vec<ValidationError> {
    DocumentValidator::new(document).validate()
}
