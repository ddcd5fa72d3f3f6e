//! Invariants spanning several records or the whole document
//!
//! Copyright (c) 2025 Trunkcfg Team
//! Licensed under the Apache-2.0 license

use serde_json::Value;

use super::conditions::{is_absent, strict_equals};
use super::path;
use super::ValidationError;
use crate::document::{ConfigDocument, Entity};
use crate::schema::{self, global, source, system, SchemaKind};

/// Run every document-level rule
pub fn validate_document_rules(document: &ConfigDocument) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    errors.extend(validate_version(document));
    errors.extend(validate_minimum_records(document));
    errors.extend(validate_frequency_correction(document));
    errors.extend(validate_channel_sources(document));
    errors.extend(validate_unique_short_names(document));
    errors.extend(validate_plugin_global_flags(document));
    errors
}

/// The format version must be exactly 2
pub fn validate_version(document: &ConfigDocument) -> Vec<ValidationError> {
    let version = document.global.get(global::VERSION_KEY);
    let is_current = version
        .and_then(Value::as_f64)
        .is_some_and(|v| v == global::REQUIRED_VERSION as f64);

    if is_current {
        return Vec::new();
    }

    let actual = version.map_or_else(|| "missing".to_string(), Value::to_string);
    vec![ValidationError::error(
        path::global_field(global::VERSION_KEY),
        format!("Config version must be {}", global::REQUIRED_VERSION),
    )
    .with_expected(global::REQUIRED_VERSION.to_string())
    .with_actual(actual)]
}

/// At least one source and one system
pub fn validate_minimum_records(document: &ConfigDocument) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if document.sources.is_empty() {
        errors.push(
            ValidationError::error(path::section(SchemaKind::Source), "At least one source is required")
                .with_expected("at least 1 source")
                .with_actual("0 sources"),
        );
    }

    if document.systems.is_empty() {
        errors.push(
            ValidationError::error(path::section(SchemaKind::System), "At least one system is required")
                .with_expected("at least 1 system")
                .with_actual("0 systems"),
        );
    }

    errors
}

fn nonzero(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        value => !is_absent(value),
    }
}

/// Warn when a source sets both Hz and ppm frequency correction
pub fn validate_frequency_correction(document: &ConfigDocument) -> Vec<ValidationError> {
    document
        .sources
        .iter()
        .enumerate()
        .filter(|(_, s)| nonzero(s.get(source::ERROR_KEY)) && nonzero(s.get(source::PPM_KEY)))
        .map(|(index, _)| {
            ValidationError::warning(
                path::record(SchemaKind::Source, index),
                format!(
                    "Source {}: Use either '{}' or '{}' for frequency correction, not both",
                    index + 1,
                    source::ERROR_KEY,
                    source::PPM_KEY
                ),
            )
        })
        .collect()
}

fn system_label(system: &Entity) -> &str {
    system.get_str(system::SHORT_NAME_KEY).unwrap_or("")
}

/// Conventional-family systems need channels or a channel file, not both
pub fn validate_channel_sources(document: &ConfigDocument) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (index, entity) in document.systems.iter().enumerate() {
        let is_conventional = entity
            .get_str(system::TYPE_KEY)
            .is_some_and(system::is_conventional_type);
        if !is_conventional {
            continue;
        }

        let has_channels = entity
            .get(system::CHANNELS_KEY)
            .and_then(Value::as_array)
            .is_some_and(|channels| !channels.is_empty());
        let has_channel_file = entity
            .get_str(system::CHANNEL_FILE_KEY)
            .is_some_and(|file| !file.trim().is_empty());

        let record = path::record(SchemaKind::System, index);
        let name = system_label(entity);
        match (has_channels, has_channel_file) {
            (false, false) => errors.push(ValidationError::error(
                record,
                format!(
                    "System \"{}\": Conventional systems require either {} or {}",
                    name,
                    system::CHANNELS_KEY,
                    system::CHANNEL_FILE_KEY
                ),
            )),
            (true, true) => errors.push(ValidationError::warning(
                record,
                format!(
                    "System \"{}\": Use {} OR {}, not both",
                    name,
                    system::CHANNELS_KEY,
                    system::CHANNEL_FILE_KEY
                ),
            )),
            _ => {}
        }
    }

    errors
}

/// Present short names must be unique; every duplicate is reported
pub fn validate_unique_short_names(document: &ConfigDocument) -> Vec<ValidationError> {
    let names: Vec<Option<&Value>> = document
        .systems
        .iter()
        .map(|s| s.get(system::SHORT_NAME_KEY).filter(|v| !is_absent(Some(*v))))
        .collect();

    names
        .iter()
        .enumerate()
        .filter_map(|(index, name)| {
            let name = (*name)?;
            let occurrences = names
                .iter()
                .copied()
                .flatten()
                .filter(|other| strict_equals(Some(*other), name))
                .count();
            (occurrences > 1).then(|| {
                let display = name.as_str().map_or_else(|| name.to_string(), str::to_string);
                ValidationError::error(
                    path::record_field(SchemaKind::System, index, system::SHORT_NAME_KEY),
                    format!("System \"{}\": Duplicate shortName detected", display),
                )
            })
        })
        .collect()
}

/// Plugins whose extension depends on a global flag need that flag set
///
/// Reported once per flag, however many plugins depend on it.
pub fn validate_plugin_global_flags(document: &ConfigDocument) -> Vec<ValidationError> {
    let registry = schema::registry();
    let mut reported: Vec<&str> = Vec::new();
    let mut errors = Vec::new();

    for plugin in &document.plugins {
        let Some(name) = plugin.get_str(schema::plugin::NAME_KEY) else {
            continue;
        };
        let Some(flag) = registry
            .plugin_extension(name)
            .and_then(|ext| ext.requires_global_flag.as_deref())
        else {
            continue;
        };
        if reported.contains(&flag) || document.global.get(flag) == Some(&Value::Bool(true)) {
            continue;
        }
        reported.push(flag);
        errors.push(
            ValidationError::error(
                path::global_field(flag),
                format!("{} must be enabled when using the {} plugin", flag, name),
            )
            .with_expected("true"),
        );
    }

    errors
}
