//! New command handler

use super::utils;
use crate::cli::NewArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputWriter;
use trunkcfg_core::{export, ConfigStore};

/// Handle the new command
pub fn handle_new(args: NewArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let store = starter_store(args.sources, args.systems);
    let summary = store.summary();

    match &args.save_to {
        Some(path) => {
            let exported = export::to_json_string_with_indent(store.document(), config.export.indent)?;
            utils::write_document(path, &exported)?;
            output.success(&format!(
                "✓ Created {} with {} source(s) and {} system(s)",
                path.display(),
                args.sources,
                args.systems
            ))?;
            if summary.errors > 0 || summary.warnings > 0 {
                output.info(&format!(
                    "{} error(s) and {} warning(s) left to fill in; run `trunkcfg validate {}`",
                    summary.errors,
                    summary.warnings,
                    path.display()
                ))?;
            }
        }
        None if output.is_human() => {
            let exported = export::to_json_string_with_indent(store.document(), config.export.indent)?;
            output.writeln(&exported)?;
        }
        None => output.data(&export::to_value(store.document()))?,
    }

    Ok(())
}

/// A store holding a document built from the creation templates
fn starter_store(sources: usize, systems: usize) -> ConfigStore {
    let mut store = ConfigStore::new();
    for _ in 0..sources {
        store.add_source();
    }
    for _ in 0..systems {
        store.add_system();
    }
    store.validate();
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;
    use trunkcfg_core::import::import_text;

    #[test]
    fn test_starter_store_uses_templates() {
        let store = starter_store(2, 2);
        let document = store.document();
        assert_eq!(document.sources.len(), 2);
        assert_eq!(document.sources[0].get_str("driver"), Some("osmosdr"));
        assert_eq!(document.systems[1].get_str("shortName"), Some("sys2"));
        assert!(store.is_dirty());
    }

    #[test]
    fn test_starter_document_reimports() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let mut output =
            OutputWriter::with_writer(OutputFormat::Human, false, true, 0, Box::new(std::io::sink()));

        handle_new(
            NewArgs {
                sources: 1,
                systems: 1,
                save_to: Some(path.clone()),
            },
            &Config::default(),
            &mut output,
        )
        .unwrap();

        let result = import_text(&fs::read_to_string(&path).unwrap());
        assert!(result.success);
        let config = result.config.unwrap();
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.systems.len(), 1);
        assert_eq!(config.systems[0].get_str("shortName"), Some("sys1"));
    }
}
