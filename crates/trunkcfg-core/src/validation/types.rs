//! Validation finding types
//!
//! Copyright (c) 2025 Trunkcfg Team
//! Licensed under the Apache-2.0 license

use serde::Serialize;

use crate::Severity;

/// One validation finding with its location path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    pub severity: Severity,
}

impl ValidationError {
    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, message, Severity::Error)
    }

    pub fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, message, Severity::Warning)
    }

    fn new(path: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            expected: None,
            actual: None,
            severity,
        }
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn with_actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Error and warning counts over a list of findings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    pub errors: usize,
    pub warnings: usize,
}

impl ValidationSummary {
    pub fn from_findings(findings: &[ValidationError]) -> Self {
        let errors = findings.iter().filter(|f| f.is_error()).count();
        Self {
            errors,
            warnings: findings.len() - errors,
        }
    }

    /// Whether nothing blocks export
    pub fn is_exportable(&self) -> bool {
        self.errors == 0
    }
}
