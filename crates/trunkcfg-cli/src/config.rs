//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/JSON/TOML)
//! - The `TRUNKCFG_CONFIG` environment variable or `--config`

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use trunkcfg_core::export::DEFAULT_INDENT;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Validation behaviour
    pub validation: ValidationConfig,

    /// Export behaviour
    pub export: ExportConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (human, json, json-pretty, yaml)
    pub format: String,

    /// Use colored output by default
    pub color: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no `-v` flag is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: String,
}

/// Validation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Treat warnings as failures
    pub deny_warnings: bool,
}

/// Export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Indentation width of exported documents
    pub indent: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            color: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            format: "compact".to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
        }
    }
}

/// On-disk syntax of a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileSyntax {
    Json,
    Yaml,
    Toml,
}

impl FileSyntax {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => FileSyntax::Yaml,
            Some("toml") => FileSyntax::Toml,
            _ => FileSyntax::Json,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config = match FileSyntax::of(path) {
            FileSyntax::Yaml => serde_yaml::from_str(&content)?,
            FileSyntax::Toml => toml::from_str(&content)?,
            FileSyntax::Json => serde_json::from_str(&content)?,
        };

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "Loaded configuration");
                        return Ok(config);
                    }
                    Err(e) => {
                        eprintln!("Warning: Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Path of the per-user configuration file
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("trunkcfg").join("config.toml"))
    }

    /// Path of the project configuration file in the current directory
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(".trunkcfg.toml")
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".trunkcfg.yaml"),
            PathBuf::from(".trunkcfg.json"),
            PathBuf::from(".trunkcfg.toml"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let trunkcfg_dir = config_dir.join("trunkcfg");
            paths.push(trunkcfg_dir.join("config.yaml"));
            paths.push(trunkcfg_dir.join("config.json"));
            paths.push(trunkcfg_dir.join("config.toml"));
        }

        paths
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = match FileSyntax::of(path) {
            FileSyntax::Yaml => serde_yaml::to_string(self)?,
            FileSyntax::Toml => toml::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize as TOML: {}", e)))?,
            FileSyntax::Json => serde_json::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample() -> Config {
        let mut config = Config::default();
        config.output.format = "json".to_string();
        config.validation.deny_warnings = true;
        config.export.indent = 2;
        config.logging.level = Some("debug".to_string());
        config
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.output.format, "human");
        assert!(!config.validation.deny_warnings);
        assert_eq!(config.export.indent, 4);
        assert_eq!(config.logging.format, "compact");
    }

    #[test]
    fn test_round_trip_all_syntaxes() {
        let dir = TempDir::new().unwrap();
        for name in ["config.toml", "config.yaml", "config.json"] {
            let path = dir.path().join(name);
            sample().save(&path).unwrap();
            assert_eq!(Config::from_file(&path).unwrap(), sample(), "{}", name);
        }
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[validation]\ndeny_warnings = true\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert!(config.validation.deny_warnings);
        assert_eq!(config.export.indent, 4);
        assert_eq!(config.output.format, "human");
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = Config::load_with_file(Some(Path::new("/nonexistent/trunkcfg.toml"))).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("dir").join("config.yaml");
        Config::default().save(&path).unwrap();
        assert!(path.exists());
    }
}
