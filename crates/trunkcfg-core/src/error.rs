//! Error types for the trunkcfg core library
//!
//! Operational failures (bad input streams, unknown entities, illegal import
//! transitions) are reported through [`Error`]. Validation findings are not
//! errors in this sense: they are collected as
//! [`ValidationError`](crate::validation::ValidationError) values and returned
//! as a complete list.

use std::fmt;
use thiserror::Error;
use serde::{Deserialize, Serialize};

use crate::document::EntityId;
use crate::schema::SchemaKind;

/// Main error type for trunkcfg operations
#[derive(Error, Debug)]
pub enum Error {
    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Illegal import transition (nothing pending, or a failed parse accepted)
    #[error("Import error: {message}")]
    Import { message: String },

    /// An update or removal addressed an identity that is not in the document
    #[error("No {kind} with id {id}")]
    EntityNotFound { kind: SchemaKind, id: EntityId },

    /// Registry lookup failures
    #[error("Schema error: {message}")]
    Schema { message: String },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Severity of a validation finding
///
/// Errors block export; warnings are informational and never block anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, never blocks
    Warning,
    /// Blocks export
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl Error {
    /// Create an import transition error
    pub fn import(message: impl Into<String>) -> Self {
        Error::Import {
            message: message.into(),
        }
    }
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::import("nothing to accept");
        assert_eq!(err.to_string(), "Import error: nothing to accept");
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(Severity::Error.to_string(), "error");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Error).unwrap();
        assert_eq!(json, "\"error\"");
    }
}
