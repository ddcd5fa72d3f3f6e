//! Output formatting and writing utilities
//!
//! This module formats command results in the selected output format
//! (human-readable, JSON, YAML) with specialized rendering for validation
//! reports, import reviews and schema sections.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::logging::redaction;
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};
use tracing::{debug, trace};
use trunkcfg_core::import::ImportResult;
use trunkcfg_core::schema::{
    ArrayItems, Condition, FieldDefinition, FieldKind, NumberConstraints, Operator, OptionValue,
    Requirement,
};
use trunkcfg_core::{ConfigStore, SchemaSection, Severity, ValidationError, ValidationSummary};

/// One finding together with a readable location
#[derive(Debug, Clone, Serialize)]
pub struct ReportedFinding {
    /// Breadcrumb such as `System #1 (metro) → shortName`
    pub location: String,
    #[serde(flatten)]
    pub finding: ValidationError,
}

/// Findings of one validation run
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub source: String,
    pub summary: ValidationSummary,
    pub findings: Vec<ReportedFinding>,
    /// Normalized, redacted document when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<Value>,
}

impl ValidationReport {
    /// Build a report from the findings stored in `store`
    pub fn from_store(source: impl Into<String>, store: &ConfigStore) -> Self {
        let findings = store
            .findings()
            .iter()
            .map(|finding| ReportedFinding {
                location: store.describe_path(&finding.path),
                finding: finding.clone(),
            })
            .collect();
        Self {
            source: source.into(),
            summary: store.summary(),
            findings,
            document: None,
        }
    }

    /// Attach the normalized document
    pub fn with_document(mut self, document: Value) -> Self {
        self.document = Some(document);
        self
    }
}

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a validation report with breadcrumbs
    fn format_validation_report(&self, report: &ValidationReport) -> Result<String>;

    /// Format an import result under review
    fn format_import_result(&self, result: &ImportResult) -> Result<String>;

    /// Format one schema section
    fn format_schema_section(&self, section: &SchemaSection) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_validation_report(&self, report: &ValidationReport) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_validation_report_human(report)),
            _ => self.format(report),
        }
    }

    fn format_import_result(&self, result: &ImportResult) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_import_result_human(result)),
            _ => self.format(result),
        }
    }

    fn format_schema_section(&self, section: &SchemaSection) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_schema_section_human(section)),
            _ => self.format(section),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    verbose: u8,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, verbose: u8) -> Self {
        Self::with_writer(format, use_color, quiet, verbose, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        verbose: u8,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            verbose,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Whether the output is meant for people rather than programs
    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write an error message
    pub fn error(&mut self, message: &str) -> Result<()> {
        if !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.red().to_string())
        } else {
            self.writeln(&format!("ERROR: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write debug information if verbose mode is enabled
    pub fn debug(&mut self, message: &str) -> Result<()> {
        if self.verbose == 0 || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "DEBUG:".dimmed(), message.dimmed()))
        } else {
            self.writeln(&format!("DEBUG: {}", message))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let mut value_json = serde_json::to_value(value)?;
        redaction::redact_json_value(&mut value_json);
        trace!(
            "Outputting data: {}",
            serde_json::to_string(&value_json).unwrap_or_else(|_| "[failed to serialize]".to_string())
        );

        let formatted = self.format.format(value)?;
        self.emit(&formatted)
    }

    /// Write a validation report
    pub fn validation_report(&mut self, report: &ValidationReport) -> Result<()> {
        let formatted = self.format.format_validation_report(report)?;
        self.emit(&formatted)
    }

    /// Write an import result under review
    pub fn import_result(&mut self, result: &ImportResult) -> Result<()> {
        let formatted = self.format.format_import_result(result)?;
        self.emit(&formatted)
    }

    /// Write one schema section
    pub fn schema_section(&mut self, section: &SchemaSection) -> Result<()> {
        let formatted = self.format.format_schema_section(section)?;
        self.emit(&formatted)
    }

    fn emit(&mut self, formatted: &str) -> Result<()> {
        if formatted.ends_with('\n') {
            self.write(formatted)
        } else {
            self.writeln(formatted)
        }
    }
}

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "❌",
        Severity::Warning => "⚠️",
    }
}

/// Format a validation report for human reading
fn format_validation_report_human(report: &ValidationReport) -> String {
    let mut output = String::new();

    if report.findings.is_empty() {
        output.push_str(&format!("✅ {}: no problems found\n", report.source));
    } else {
        push_findings_human(&mut output, report);
    }

    if let Some(document) = &report.document {
        output.push_str("\n📝 Normalized Document:\n");
        output.push_str(&serde_json::to_string_pretty(document).unwrap_or_default());
        output.push('\n');
    }

    output
}

fn push_findings_human(output: &mut String, report: &ValidationReport) {
    output.push_str(&format!(
        "🔍 {}: {} error(s), {} warning(s)\n\n",
        report.source, report.summary.errors, report.summary.warnings
    ));

    for (i, reported) in report.findings.iter().enumerate() {
        let finding = &reported.finding;
        output.push_str(&format!(
            "{}. {} [{}] {}\n",
            i + 1,
            severity_icon(finding.severity),
            finding.severity,
            reported.location
        ));
        output.push_str(&format!("   💬 {}\n", finding.message));
        output.push_str(&format!("   📍 Path: {}\n", finding.path));
        if let Some(expected) = &finding.expected {
            output.push_str(&format!("   Expected: {}\n", expected));
        }
        if let Some(actual) = &finding.actual {
            output.push_str(&format!("   Actual: {}\n", actual));
        }
    }

    if report.summary.is_exportable() {
        output.push_str("\nNo errors: the document can be exported.\n");
    } else {
        output.push_str("\nErrors must be fixed before the document can be exported.\n");
    }
}

/// Format an import result for human reading
fn format_import_result_human(result: &ImportResult) -> String {
    let mut output = String::new();

    if !result.success {
        output.push_str("❌ Import failed to parse\n");
        for error in &result.parse_errors {
            output.push_str(&format!(
                "  line {}, column {}: {}\n",
                error.line, error.column, error.message
            ));
        }
        return output;
    }

    if let Some(config) = &result.config {
        output.push_str(&format!(
            "✅ Parsed {} source(s), {} system(s), {} plugin(s)\n",
            config.sources.len(),
            config.systems.len(),
            config.plugins.len()
        ));
    }

    if result.schema_warnings.is_empty() {
        output.push_str("No schema warnings\n");
    } else {
        output.push_str(&format!("⚠️ {} schema warning(s):\n", result.schema_warnings.len()));
        for (i, warning) in result.schema_warnings.iter().enumerate() {
            output.push_str(&format!("  {}. {}: {}\n", i + 1, warning.path, warning.message));
        }
    }

    output
}

/// Format a schema section as a field table
fn format_schema_section_human(section: &SchemaSection) -> String {
    let mut output = String::new();
    output.push_str(&format!("{} ({})\n", section.title, section.id));
    output.push_str(&format!("{}\n\n", section.description));

    let rows = section.fields.iter().map(field_row).collect::<Vec<_>>();
    output.push_str(&render_table(
        &["Key", "Type", "Required", "Default", "Constraints", "Applies when"],
        &rows,
    ));
    output
}

fn field_row(field: &FieldDefinition) -> Vec<String> {
    let mut key = field.key.clone();
    if field.advanced {
        key.push_str(" *");
    }
    vec![
        key,
        field.kind.type_name().to_string(),
        describe_requirement(&field.required),
        field.default.as_ref().map(format_value_compact).unwrap_or_default(),
        describe_constraints(&field.kind),
        describe_conditions(&field.conditions),
    ]
}

fn describe_requirement(requirement: &Requirement) -> String {
    match requirement {
        Requirement::Always(true) => "yes".to_string(),
        Requirement::Always(false) => String::new(),
        Requirement::WhenConditionsHold(conditions) => {
            format!("when {}", describe_conditions(conditions))
        }
    }
}

fn describe_conditions(conditions: &[Condition]) -> String {
    conditions
        .iter()
        .map(describe_condition)
        .collect::<Vec<_>>()
        .join(" and ")
}

fn describe_condition(condition: &Condition) -> String {
    let value = condition
        .value
        .as_ref()
        .map(format_value_compact)
        .unwrap_or_default();
    match condition.operator {
        Operator::Eq => format!("{} = {}", condition.field, value),
        Operator::Neq => format!("{} != {}", condition.field, value),
        Operator::In => format!("{} in {}", condition.field, value),
        Operator::NotIn => format!("{} not in {}", condition.field, value),
        Operator::Exists => format!("{} is set", condition.field),
        Operator::NotExists => format!("{} is not set", condition.field),
    }
}

fn describe_range(constraints: &NumberConstraints) -> String {
    match (constraints.min, constraints.max) {
        (Some(min), Some(max)) => format!("{}..{}", min, max),
        (Some(min), None) => format!(">= {}", min),
        (None, Some(max)) => format!("<= {}", max),
        (None, None) => String::new(),
    }
}

fn describe_constraints(kind: &FieldKind) -> String {
    match kind {
        FieldKind::Number(c) | FieldKind::Frequency(c) => describe_range(c),
        FieldKind::String(c) => {
            let mut parts = Vec::new();
            match (c.min_length, c.max_length) {
                (Some(min), Some(max)) => parts.push(format!("{}-{} chars", min, max)),
                (Some(min), None) => parts.push(format!(">= {} chars", min)),
                (None, Some(max)) => parts.push(format!("<= {} chars", max)),
                (None, None) => {}
            }
            if let Some(pattern) = &c.pattern {
                parts.push(pattern.clone());
            }
            parts.join(", ")
        }
        FieldKind::Select { options } => options
            .iter()
            .map(|option| match &option.value {
                OptionValue::Text(s) => s.clone(),
                OptionValue::Number(n) => n.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" | "),
        FieldKind::Array(c) => {
            let items = match &c.items {
                ArrayItems::Any => "any".to_string(),
                ArrayItems::String => "string".to_string(),
                ArrayItems::Number => "number".to_string(),
                ArrayItems::Frequency => "frequency".to_string(),
                ArrayItems::Boolean => "boolean".to_string(),
                ArrayItems::Object(fields) => format!(
                    "{{{}}}",
                    fields.iter().map(|f| f.key.as_str()).collect::<Vec<_>>().join(", ")
                ),
            };
            match (c.min_items, c.max_items) {
                (Some(min), _) => format!("{} items, >= {}", items, min),
                (None, Some(max)) => format!("{} items, <= {}", items, max),
                (None, None) => format!("{} items", items),
            }
        }
        FieldKind::Boolean | FieldKind::Object { .. } => String::new(),
    }
}

/// Render rows under a header with aligned columns
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let render_row = |cells: Vec<&str>| {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:width$}", cell, width = widths[i]))
            .collect::<Vec<_>>()
            .join(" │ ")
            .trim_end()
            .to_string()
    };

    let mut output = String::new();
    output.push_str(&render_row(headers.to_vec()));
    output.push('\n');
    output.push_str(
        &widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─"),
    );
    output.push('\n');
    for row in rows {
        output.push_str(&render_row(row.iter().map(String::as_str).collect()));
        output.push('\n');
    }
    output
}

/// Format a JSON value in a compact, human-readable way
fn format_value_compact(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => format!(
            "[{}]",
            arr.iter().map(format_value_compact).collect::<Vec<_>>().join(", ")
        ),
        Value::Object(obj) => {
            if obj.len() <= 2 {
                let items: Vec<String> = obj
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, format_value_compact(v)))
                    .collect();
                format!("{{{}}}", items.join(", "))
            } else {
                format!("{{{} fields}}", obj.len())
            }
        }
    }
}
