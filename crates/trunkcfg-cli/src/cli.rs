//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Trunkcfg CLI - Validate and reconcile trunk-recorder configurations
///
/// Checks trunk-recorder config.json files against the field schema,
/// reviews imports before they are accepted, and scaffolds new documents.
#[derive(Parser, Debug)]
#[command(
    name = "trunkcfg",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "TRUNKCFG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results (defaults to the configured format)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a trunk-recorder configuration file
    Validate(ValidateArgs),

    /// Review an import and optionally accept it as a normalized document
    Import(ImportArgs),

    /// Create a starter configuration document
    New(NewArgs),

    /// Print the field schema
    Schema(SchemaArgs),

    /// Manage the tool's own configuration file
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the configuration file (JSON or YAML)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Fail when any warning is reported
    #[arg(long)]
    pub deny_warnings: bool,

    /// Also print the normalized document
    #[arg(long)]
    pub detailed: bool,
}

/// Arguments for the import command
#[derive(Parser, Debug)]
pub struct ImportArgs {
    /// Path to the file to import, or "-" for stdin
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Accept the import and emit the normalized document
    #[arg(long)]
    pub accept: bool,

    /// Write the accepted document to a file instead of stdout
    #[arg(long = "save-to", value_name = "OUTPUT_FILE", requires = "accept")]
    pub save_to: Option<PathBuf>,
}

/// Arguments for the new command
#[derive(Parser, Debug)]
pub struct NewArgs {
    /// Number of sources to create
    #[arg(long, default_value = "1")]
    pub sources: usize,

    /// Number of systems to create
    #[arg(long, default_value = "1")]
    pub systems: usize,

    /// Write the document to a file instead of stdout
    #[arg(long = "save-to", value_name = "OUTPUT_FILE")]
    pub save_to: Option<PathBuf>,
}

/// Arguments for the schema command
#[derive(Parser, Debug)]
pub struct SchemaArgs {
    /// Section to print (all sections when omitted)
    #[arg(value_enum)]
    pub section: Option<SchemaTarget>,

    /// Print the extension schema of a named plugin
    #[arg(long, value_name = "NAME", conflicts_with = "section")]
    pub plugin: Option<String>,

    /// Include advanced fields
    #[arg(long)]
    pub advanced: bool,
}

/// Schema sections that can be printed
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SchemaTarget {
    Global,
    Source,
    System,
    Plugin,
}

impl From<SchemaTarget> for trunkcfg_core::SchemaKind {
    fn from(target: SchemaTarget) -> Self {
        match target {
            SchemaTarget::Global => trunkcfg_core::SchemaKind::Global,
            SchemaTarget::Source => trunkcfg_core::SchemaKind::Source,
            SchemaTarget::System => trunkcfg_core::SchemaKind::System,
            SchemaTarget::Plugin => trunkcfg_core::SchemaKind::Plugin,
        }
    }
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init(ConfigInitArgs),

    /// Show the effective configuration
    Show(ConfigShowArgs),
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Write the user config instead of .trunkcfg.toml in the current directory
    #[arg(long)]
    pub user: bool,

    /// Force overwrite existing config files
    #[arg(long)]
    pub force: bool,
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "toml")]
    pub format: ConfigFormat,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}
