//! Command handlers for CLI subcommands
//!
//! Each submodule implements one subcommand on top of `trunkcfg-core`.

mod completions;
mod config;
mod import;
mod new;
mod schema;
mod utils;
mod validate;

pub use completions::handle_completions;
pub use config::handle_config;
pub use import::handle_import;
pub use new::handle_new;
pub use schema::handle_schema;
pub use validate::handle_validate;
