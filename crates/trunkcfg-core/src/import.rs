//! Import reconciliation
//!
//! Text goes through parse, identity assignment and full validation, then
//! waits in review until the caller accepts or cancels it. Only a failed
//! parse blocks acceptance; validation findings are reported as schema
//! warnings whatever their severity.
//!
//! Copyright (c) 2025 Trunkcfg Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::document::{ConfigDocument, Entity, GlobalSettings};
use crate::export;
use crate::schema::SchemaKind;
use crate::store::ConfigStore;
use crate::validation::validate_document;
use crate::{Error, Result};

/// Member name that carries an identity in other tools' documents
const IDENTITY_KEY: &str = "id";

/// Structural shape an import must have
#[derive(Debug, Deserialize)]
struct WireDocument {
    #[serde(default)]
    sources: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    systems: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    plugins: Option<Vec<Map<String, Value>>>,
    #[serde(flatten)]
    global: Map<String, Value>,
}

/// A structural parse failure, located in the input text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    /// 1-based line
    pub line: usize,
    /// 1-based column
    pub column: usize,
    pub message: String,
}

impl From<&serde_json::Error> for ParseError {
    fn from(err: &serde_json::Error) -> Self {
        // The location lives in `line`/`column`; drop the parser's own suffix
        let text = err.to_string();
        let suffix = format!(" at line {} column {}", err.line(), err.column());
        let message = text.strip_suffix(&suffix).unwrap_or(&text).to_string();

        Self {
            line: err.line().max(1),
            column: err.column().max(1),
            message,
        }
    }
}

/// A validation finding reported during import review
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaWarning {
    pub path: String,
    pub message: String,
}

/// Outcome of one import attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub success: bool,
    /// Reconstructed document, present exactly when parsing succeeded
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_wire_document"
    )]
    pub config: Option<ConfigDocument>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parse_errors: Vec<ParseError>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub schema_warnings: Vec<SchemaWarning>,
}

fn serialize_wire_document<S: Serializer>(
    config: &Option<ConfigDocument>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    config.as_ref().map(export::to_value).serialize(serializer)
}

impl ImportResult {
    fn parse_failure(err: &serde_json::Error) -> Self {
        Self {
            success: false,
            config: None,
            parse_errors: vec![ParseError::from(err)],
            schema_warnings: Vec::new(),
        }
    }
}

fn entities(kind: SchemaKind, records: Option<Vec<Map<String, Value>>>) -> Vec<Entity> {
    records
        .unwrap_or_default()
        .into_iter()
        .map(|mut fields| {
            fields.remove(IDENTITY_KEY);
            Entity::new(kind, fields)
        })
        .collect()
}

/// Parse, assign identities and validate, without touching any store
pub fn import_text(text: &str) -> ImportResult {
    let wire: WireDocument = match serde_json::from_str(text) {
        Ok(wire) => wire,
        Err(err) => {
            debug!(line = err.line(), column = err.column(), "Import parse failed");
            return ImportResult::parse_failure(&err);
        }
    };

    let document = ConfigDocument {
        global: GlobalSettings::from_map(wire.global),
        sources: entities(SchemaKind::Source, wire.sources),
        systems: entities(SchemaKind::System, wire.systems),
        plugins: entities(SchemaKind::Plugin, wire.plugins),
    };

    let schema_warnings = validate_document(&document)
        .into_iter()
        .map(|finding| SchemaWarning {
            path: finding.path,
            message: finding.message,
        })
        .collect();

    ImportResult {
        success: true,
        config: Some(document),
        parse_errors: Vec::new(),
        schema_warnings,
    }
}

/// Where the reconciler is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportState {
    Idle,
    Parsing,
    Reviewing,
}

/// Owner of the single in-flight import
#[derive(Debug)]
pub struct ImportReconciler {
    state: ImportState,
    pending: Option<ImportResult>,
}

impl Default for ImportReconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportReconciler {
    pub fn new() -> Self {
        Self {
            state: ImportState::Idle,
            pending: None,
        }
    }

    pub fn state(&self) -> ImportState {
        self.state
    }

    /// The result under review, if any
    pub fn pending(&self) -> Option<&ImportResult> {
        self.pending.as_ref()
    }

    /// Start an import, discarding any result still under review
    pub fn begin(&mut self, text: &str) -> &ImportResult {
        if self.pending.take().is_some() {
            debug!("Discarding previous pending import");
        }
        self.state = ImportState::Parsing;

        let result = import_text(text);
        debug!(
            success = result.success,
            warnings = result.schema_warnings.len(),
            "Import ready for review"
        );

        self.state = ImportState::Reviewing;
        self.pending.insert(result)
    }

    /// Replace the store's document with the pending import
    ///
    /// Fails when nothing is pending or the pending import did not parse; in
    /// the latter case the result stays under review.
    pub fn accept(&mut self, store: &mut ConfigStore) -> Result<()> {
        let result = self
            .pending
            .take()
            .ok_or_else(|| Error::import("no import is pending"))?;

        let Some(document) = result.config else {
            self.pending = Some(result);
            return Err(Error::import("cannot accept an import that failed to parse"));
        };

        info!(
            sources = document.sources.len(),
            systems = document.systems.len(),
            plugins = document.plugins.len(),
            "Accepted import"
        );
        store.set_document(document);
        self.state = ImportState::Idle;
        Ok(())
    }

    /// Drop the pending import; always succeeds
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            info!("Canceled import");
        }
        self.state = ImportState::Idle;
    }
}
