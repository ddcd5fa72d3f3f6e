//! Trunkcfg CLI - Command-line interface for trunk-recorder configurations
//!
//! This is the main entry point for the trunkcfg application, providing
//! commands for validating, importing and scaffolding trunk-recorder
//! config.json documents.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use clap::ValueEnum;
use cli::{Cli, Commands, OutputFormat};
use colored::control;
use config::Config;
use error::{Error, Result};
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // The configuration decides colors and log format, so it loads first
    let config = Config::load_with_file(cli.config.as_deref());
    let use_color = cli.use_color() && config.as_ref().map_or(true, |c| c.output.color);
    control::set_override(use_color);

    if let Err(e) = init_logging(&cli, config.as_ref().ok()) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let result = config.and_then(|config| run(cli, &config, use_color));

    match result {
        Ok(()) => {
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}", error::format_error(&e, use_color));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip(cli, config, use_color), fields(command = ?cli.command))]
fn run(cli: Cli, config: &Config, use_color: bool) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let format = resolve_output_format(cli.output, config)?;
    let mut output = OutputWriter::new(format, use_color, cli.quiet, cli.verbosity_level());

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        format = ?output.format(),
        "Executing command"
    );

    match cli.command {
        Commands::Validate(args) => handlers::handle_validate(args, config, &mut output),
        Commands::Import(args) => handlers::handle_import(args, config, &mut output),
        Commands::New(args) => handlers::handle_new(args, config, &mut output),
        Commands::Schema(args) => handlers::handle_schema(args, &mut output),
        Commands::Config(args) => handlers::handle_config(args, config, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args, &mut std::io::stdout()),
    }
}

/// The `--output` flag, or the configured default format
fn resolve_output_format(flag: Option<OutputFormat>, config: &Config) -> Result<OutputFormat> {
    match flag {
        Some(format) => Ok(format),
        None => OutputFormat::from_str(&config.output.format, true).map_err(|_| {
            Error::config(format!(
                "Invalid output format '{}' (expected human, json, json-pretty or yaml)",
                config.output.format
            ))
        }),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: Option<&Config>) -> Result<()> {
    let verbosity = cli.verbosity_level();
    let mut logging_config = LoggingConfig::from_verbosity(verbosity);

    if let Some(config) = config {
        logging_config.apply_settings(&config.logging, verbosity);
    }

    // Apply environment overrides
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
    }

    logging::init_logging(logging_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["trunkcfg", "-vv", "validate", "config.json"]);
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::parse_from(["trunkcfg", "--quiet", "validate", "config.json"]);
        assert_eq!(cli.verbosity_level(), 0);

        let cli = Cli::parse_from(["trunkcfg", "-o", "json-pretty", "schema", "source"]);
        assert_eq!(cli.output, Some(OutputFormat::JsonPretty));
    }

    #[test]
    fn test_output_format_falls_back_to_config() {
        let mut config = Config::default();
        assert_eq!(resolve_output_format(None, &config).unwrap(), OutputFormat::Human);

        config.output.format = "YAML".to_string();
        assert_eq!(resolve_output_format(None, &config).unwrap(), OutputFormat::Yaml);
        assert_eq!(
            resolve_output_format(Some(OutputFormat::Json), &config).unwrap(),
            OutputFormat::Json
        );

        config.output.format = "xml".to_string();
        assert!(matches!(resolve_output_format(None, &config), Err(Error::Config(_))));
    }
}
