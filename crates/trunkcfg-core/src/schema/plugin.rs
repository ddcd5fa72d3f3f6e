//! Plugin base schema and per-plugin extensions

use serde::Serialize;
use serde_json::{json, Map, Value};

use super::global::AUDIO_STREAMING_KEY;
use super::types::{ArrayItems, Condition, FieldDefinition, SchemaSection};

/// Plugin name field, also the key into the extension table
pub const NAME_KEY: &str = "name";

/// A plugin-specific schema layered on top of the base plugin fields
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginExtension {
    /// Plugin name this extension applies to
    pub name: String,
    pub section: SchemaSection,
    /// Global boolean flag that must be enabled whenever this plugin is present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_global_flag: Option<String>,
}

fn creation_template() -> Map<String, Value> {
    match json!({ "library": "", "name": "", "enabled": true }) {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

pub(crate) fn base_section() -> SchemaSection {
    SchemaSection::new(
        "plugin",
        "Plugin",
        "Plugin configuration",
        vec![
            FieldDefinition::string(
                "library",
                "Library",
                "Plugin library filename (e.g., librdioscanner_uploader.so).",
            )
            .required()
            .placeholder("libmyplugin.so"),
            FieldDefinition::string(
                NAME_KEY,
                "Plugin Name",
                "Plugin name that matches the _plugin_new function.",
            )
            .required()
            .placeholder("myplugin"),
            FieldDefinition::boolean("enabled", "Enabled", "Enable or disable this plugin.")
                .default_value(true),
        ],
    )
    .with_creation_template(creation_template())
}

fn rdio_scanner(base: &SchemaSection) -> PluginExtension {
    let systems_item = vec![
        FieldDefinition::string(
            "shortName",
            "System Short Name",
            "Must match a configured system's shortName.",
        )
        .required(),
        FieldDefinition::number("systemId", "Rdio Scanner System ID", "System ID in Rdio Scanner.")
            .required()
            .min(1.0),
        FieldDefinition::string("apiKey", "API Key", "API key for this system in Rdio Scanner.")
            .required(),
    ];

    PluginExtension {
        name: "rdioscanner_uploader".to_string(),
        section: base.extend(
            "plugin_rdioscanner",
            "Rdio Scanner Plugin",
            "Upload recordings to Rdio Scanner",
            vec![
                FieldDefinition::string("server", "Server URL", "URL of your Rdio Scanner instance.")
                    .required()
                    .placeholder("https://your-rdio-scanner.com"),
                FieldDefinition::array(
                    "systems",
                    "Systems",
                    "Systems to upload to Rdio Scanner.",
                    ArrayItems::Object(systems_item),
                )
                .required()
                .min_items(1),
            ],
        ),
        requires_global_flag: None,
    }
}

fn simple_stream(base: &SchemaSection) -> PluginExtension {
    let streams_item = vec![
        FieldDefinition::string("address", "Address", "IP address to stream to.")
            .required()
            .placeholder("127.0.0.1"),
        FieldDefinition::number("port", "Port", "Port number.")
            .required()
            .min(1.0)
            .max(65535.0),
        FieldDefinition::number("TGID", "Talkgroup ID", "Talkgroup to stream (0 = all).")
            .required()
            .default_value(0)
            .min(0.0),
        FieldDefinition::string(
            "shortName",
            "System Short Name",
            "Limit to specific system (omit for all).",
        ),
        FieldDefinition::boolean(
            "sendJSON",
            "Send JSON Metadata",
            "Prepend JSON metadata to audio packets.",
        )
        .default_value(false),
        FieldDefinition::boolean("sendCallStart", "Send Call Start", "Send JSON at call start.")
            .default_value(false)
            .when(Condition::eq("sendJSON", true)),
        FieldDefinition::boolean("sendCallEnd", "Send Call End", "Send JSON at call end.")
            .default_value(false)
            .when(Condition::eq("sendJSON", true)),
        FieldDefinition::boolean("useTCP", "Use TCP", "Use TCP instead of UDP.").default_value(false),
    ];

    PluginExtension {
        name: "simplestream".to_string(),
        section: base.extend(
            "plugin_simplestream",
            "Simple Stream Plugin",
            "Stream audio over UDP/TCP",
            vec![FieldDefinition::array(
                "streams",
                "Streams",
                "Stream destinations.",
                ArrayItems::Object(streams_item),
            )
            .required()
            .min_items(1)],
        ),
        requires_global_flag: Some(AUDIO_STREAMING_KEY.to_string()),
    }
}

pub(crate) fn extensions(base: &SchemaSection) -> Vec<PluginExtension> {
    vec![rdio_scanner(base), simple_stream(base)]
}
