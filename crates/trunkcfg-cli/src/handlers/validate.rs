//! Validate command handler

use super::utils;
use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::{redaction, timing::Timer};
use crate::output::{OutputWriter, ValidationReport};
use trunkcfg_core::import::import_text;
use trunkcfg_core::{export, ConfigStore};

/// Handle the validate command
pub fn handle_validate(args: ValidateArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let source = args.file.display().to_string();
    let _timer = Timer::with_details("validate", &source);
    output.info(&format!("Validating configuration: {}", source))?;

    let text = utils::load_document_text(&args.file)?;
    let parsed = import_text(&text);
    let Some(document) = parsed.config.clone() else {
        output.error("✗ Configuration could not be parsed")?;
        output.import_result(&parsed)?;
        return Err(Error::InvalidFormat {
            path: args.file,
            expected: "trunk-recorder JSON".to_string(),
        });
    };

    let mut store = ConfigStore::new();
    store.set_document(document);
    store.validate();
    output.debug(&format!("{} finding(s) collected", store.findings().len()))?;

    let mut report = ValidationReport::from_store(source, &store);
    if args.detailed {
        let mut value = export::to_value(store.document());
        redaction::redact_json_value(&mut value);
        report = report.with_document(value);
    }
    output.validation_report(&report)?;

    let deny_warnings = args.deny_warnings || config.validation.deny_warnings;
    let summary = report.summary;
    if summary.errors > 0 || (deny_warnings && summary.warnings > 0) {
        return Err(Error::ValidationFailed {
            errors: summary.errors,
            warnings: summary.warnings,
        });
    }

    output.success("✓ Configuration is valid")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const VALID: &str = r#"{
    "ver": 2,
    "sources": [{"driver": "osmosdr", "center": 851000000, "rate": 2048000, "gain": 30}],
    "systems": [{"shortName": "metro", "type": "p25", "control_channels": [851012500]}]
}"#;

    const FREQUENCY_CORRECTION_TWICE: &str = r#"{
    "ver": 2,
    "sources": [{"driver": "osmosdr", "center": 851000000, "rate": 2048000, "gain": 30, "error": 120, "ppm": 1.5}],
    "systems": [{"shortName": "metro", "type": "p25", "control_channels": [851012500]}]
}"#;

    fn sink() -> OutputWriter {
        OutputWriter::with_writer(OutputFormat::Human, false, false, 0, Box::new(std::io::sink()))
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn args(file: PathBuf, deny_warnings: bool) -> ValidateArgs {
        ValidateArgs {
            file,
            deny_warnings,
            detailed: true,
        }
    }

    #[test]
    fn test_valid_document_passes() {
        let dir = TempDir::new().unwrap();
        let file = write(dir.path(), "config.json", VALID);
        handle_validate(args(file, false), &Config::default(), &mut sink()).unwrap();
    }

    #[test]
    fn test_errors_fail_the_run() {
        let dir = TempDir::new().unwrap();
        let file = write(dir.path(), "config.json", r#"{"ver": 1, "sources": [], "systems": []}"#);

        let err = handle_validate(args(file, false), &Config::default(), &mut sink()).unwrap_err();
        match err {
            Error::ValidationFailed { errors, .. } => assert!(errors >= 3),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_warnings_only_fail_when_denied() {
        let dir = TempDir::new().unwrap();
        let file = write(dir.path(), "config.json", FREQUENCY_CORRECTION_TWICE);

        handle_validate(args(file.clone(), false), &Config::default(), &mut sink()).unwrap();

        let err = handle_validate(args(file.clone(), true), &Config::default(), &mut sink()).unwrap_err();
        assert!(matches!(err, Error::ValidationFailed { errors: 0, warnings: 1 }));

        let mut config = Config::default();
        config.validation.deny_warnings = true;
        let err = handle_validate(args(file, false), &config, &mut sink()).unwrap_err();
        assert_eq!(err.exit_code(), 6);
    }

    #[test]
    fn test_unparseable_document() {
        let dir = TempDir::new().unwrap();
        let file = write(dir.path(), "config.json", "{\"ver\": 2,");

        let err = handle_validate(args(file, false), &Config::default(), &mut sink()).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { .. }));
    }

    #[test]
    fn test_yaml_document() {
        let dir = TempDir::new().unwrap();
        let yaml = "ver: 2\nsources:\n  - driver: osmosdr\n    center: 851000000\n    rate: 2048000\n    gain: 30\nsystems:\n  - shortName: metro\n    type: p25\n    control_channels: [851012500]\n";
        let file = write(dir.path(), "config.yaml", yaml);
        handle_validate(args(file, false), &Config::default(), &mut sink()).unwrap();
    }
}
