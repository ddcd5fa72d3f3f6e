//! Trunkcfg Core - Schema-driven validation and import reconciliation for
//! trunk-recorder configuration documents
//!
//! This crate describes every configurable field of a trunk-recorder
//! configuration as data, validates documents against that description and
//! reconciles imported documents before they replace the live one.
//!
//! # Main Components
//!
//! - **Schema Registry**: field definitions for global settings, sources,
//!   systems, plugins and per-plugin extensions
//! - **Validation**: condition evaluation, per-field checks and
//!   document-level rules producing a complete list of findings
//! - **Editing Store**: the owned live document with add/update/remove,
//!   dirty tracking and navigation from findings back to records
//! - **Import/Export**: wire-format parsing with review before acceptance,
//!   and normalized output
//!
//! # Example
//!
//! ```
//! use trunkcfg_core::{import::ImportReconciler, ConfigStore, Result};
//!
//! fn example() -> Result<()> {
//!     let mut store = ConfigStore::new();
//!     let mut reconciler = ImportReconciler::new();
//!
//!     let result = reconciler.begin(r#"{"ver": 2, "sources": [], "systems": []}"#);
//!     assert!(result.success);
//!     reconciler.accept(&mut store)?;
//!
//!     let findings = store.validate();
//!     assert!(!findings.is_empty());
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod error;
pub mod schema;
pub mod document;
pub mod validation;
pub mod store;
pub mod export;
pub mod import;

// Re-export main types for convenience
pub use error::{Error, Result, Severity};
pub use document::{ConfigDocument, Entity, EntityId, FieldBag, GlobalSettings, RecordView};
pub use schema::{
    registry, FieldDefinition, FieldKind, SchemaKind, SchemaRegistry, SchemaSection,
};
pub use validation::{validate_document, ValidationError, ValidationSummary};
pub use store::{visible_fields, ConfigStore, Selection};
pub use import::{ImportReconciler, ImportResult, ImportState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
