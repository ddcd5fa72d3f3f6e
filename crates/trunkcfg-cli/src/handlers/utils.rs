//! Shared utilities for command handlers

use crate::error::{Error, Result};
use anyhow::Context;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Path that selects stdin instead of a file
const STDIN_PATH: &str = "-";

/// Whether `path` names stdin
pub fn is_stdin(path: &Path) -> bool {
    path == Path::new(STDIN_PATH)
}

/// Whether `path` has a `.json` extension (case-insensitive)
pub fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false)
}

/// Read a file, or stdin for `-`
pub fn read_input(path: &Path) -> Result<String> {
    if is_stdin(path) {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read configuration from stdin")?;
        return Ok(content);
    }

    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(fs::read_to_string(path)?)
}

/// Read a configuration document as JSON text
///
/// YAML files are converted to JSON first; everything else is passed
/// through verbatim so parse errors keep their original line and column.
pub fn load_document_text(path: &Path) -> Result<String> {
    let content = read_input(path)?;
    if !is_yaml(path) {
        return Ok(content);
    }

    let value: serde_json::Value = serde_yaml::from_str(&content).map_err(|_| Error::InvalidFormat {
        path: path.to_path_buf(),
        expected: "YAML".to_string(),
    })?;
    Ok(serde_json::to_string(&value)?)
}

/// Write an exported document, ending it with a newline
pub fn write_document(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, format!("{}\n", text))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_extension_checks() {
        assert!(has_json_extension(Path::new("config.json")));
        assert!(has_json_extension(Path::new("CONFIG.JSON")));
        assert!(!has_json_extension(Path::new("config.txt")));
        assert!(!has_json_extension(Path::new("config")));
        assert!(is_stdin(Path::new("-")));
    }

    #[test]
    fn test_yaml_is_converted_to_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "ver: 2\nsources: []\n").unwrap();

        let text = load_document_text(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, serde_json::json!({"ver": 2, "sources": []}));
    }

    #[test]
    fn test_missing_file() {
        let err = read_input(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_write_document_appends_newline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("config.json");
        write_document(&path, "{}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}\n");
    }
}
