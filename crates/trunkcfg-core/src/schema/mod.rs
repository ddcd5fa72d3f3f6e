//! Field schema registry
//!
//! Process-wide, immutable description of every configurable field for the
//! four entity kinds, plus plugin-specific extensions keyed by plugin name.
//! Every other component reads field semantics from here.
//!
//! - `types`: the field definition data model
//! - `global`, `source`, `system`, `plugin`: the field tables
//!
//! Copyright (c) 2025 Trunkcfg Team
//! Licensed under the Apache-2.0 license

pub mod types;
pub mod global;
pub mod source;
pub mod system;
pub mod plugin;

use std::sync::OnceLock;

use serde::Serialize;

use crate::{Error, Result};

pub use plugin::PluginExtension;
pub use types::{
    hz_to_mhz, mhz_to_hz, ArrayConstraints, ArrayItems, Condition, FieldDefinition, FieldKind,
    NumberConstraints, Operator, OptionValue, Requirement, SchemaKind, SchemaSection,
    SelectOption, StringConstraints,
};

static REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();

/// All schema sections known to the system
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaRegistry {
    pub global: SchemaSection,
    pub source: SchemaSection,
    pub system: SchemaSection,
    pub plugin: SchemaSection,
    pub plugin_extensions: Vec<PluginExtension>,
}

impl SchemaRegistry {
    fn build() -> Self {
        let plugin = plugin::base_section();
        let plugin_extensions = plugin::extensions(&plugin);
        Self {
            global: global::section(),
            source: source::section(),
            system: system::section(),
            plugin,
            plugin_extensions,
        }
    }

    /// Section for an entity kind (the base section for plugins)
    pub fn schema(&self, kind: SchemaKind) -> &SchemaSection {
        match kind {
            SchemaKind::Global => &self.global,
            SchemaKind::Source => &self.source,
            SchemaKind::System => &self.system,
            SchemaKind::Plugin => &self.plugin,
        }
    }

    /// Extension registered for a plugin name
    pub fn plugin_extension(&self, name: &str) -> Option<&PluginExtension> {
        self.plugin_extensions.iter().find(|ext| ext.name == name)
    }

    /// Extension schema for a plugin name, if one is registered
    pub fn plugin_schema(&self, name: &str) -> Option<&SchemaSection> {
        self.plugin_extension(name).map(|ext| &ext.section)
    }

    /// Extension schema for a plugin name, failing for unregistered names
    pub fn require_plugin_schema(&self, name: &str) -> Result<&SchemaSection> {
        self.plugin_schema(name).ok_or_else(|| Error::Schema {
            message: format!(
                "unknown plugin '{}'; plugins with a schema: {}",
                name,
                self.plugin_kinds().collect::<Vec<_>>().join(", ")
            ),
        })
    }

    /// Schema governing a plugin record: its extension, or the base fields
    pub fn effective_plugin_schema(&self, name: Option<&str>) -> &SchemaSection {
        name.and_then(|n| self.plugin_schema(n)).unwrap_or(&self.plugin)
    }

    /// Look up a field definition by kind and key
    pub fn field(&self, kind: SchemaKind, key: &str) -> Option<&FieldDefinition> {
        self.schema(kind).field(key)
    }

    /// Names of plugins that have a registered extension
    pub fn plugin_kinds(&self) -> impl Iterator<Item = &str> {
        self.plugin_extensions.iter().map(|ext| ext.name.as_str())
    }
}

/// The process-wide schema registry
pub fn registry() -> &'static SchemaRegistry {
    REGISTRY.get_or_init(SchemaRegistry::build)
}

/// Shorthand for `registry().schema(kind)`
pub fn schema(kind: SchemaKind) -> &'static SchemaSection {
    registry().schema(kind)
}
