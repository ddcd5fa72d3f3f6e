//! Import command handler

use super::utils;
use crate::cli::ImportArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use trunkcfg_core::{export, ConfigStore, ImportReconciler};

/// Handle the import command
///
/// The import is reviewed first; it only replaces anything when `--accept`
/// is given, and then lands in a fresh store whose export is written out.
pub fn handle_import(args: ImportArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("import");

    if !utils::is_stdin(&args.file) && !utils::has_json_extension(&args.file) {
        output.warning(&format!(
            "{} does not have a .json extension; importing anyway",
            args.file.display()
        ))?;
    }

    let text = utils::read_input(&args.file)?;
    let mut reconciler = ImportReconciler::new();
    let parsed = reconciler.begin(&text);
    output.import_result(parsed)?;
    let success = parsed.success;

    if !args.accept {
        reconciler.cancel();
        if !success {
            return Err(Error::InvalidFormat {
                path: args.file,
                expected: "trunk-recorder JSON".to_string(),
            });
        }
        output.info("Import not applied; pass --accept to accept it")?;
        return Ok(());
    }

    let mut store = ConfigStore::new();
    match reconciler.accept(&mut store) {
        Ok(()) => {}
        Err(trunkcfg_core::Error::Import { message }) => {
            return Err(Error::ImportRejected { message });
        }
        Err(other) => return Err(other.into()),
    }

    let exported = export::to_json_string_with_indent(store.document(), config.export.indent)?;
    match &args.save_to {
        Some(path) => {
            utils::write_document(path, &exported)?;
            store.mark_clean();
            output.success(&format!("✓ Wrote normalized document to {}", path.display()))?;
        }
        None if output.is_human() => {
            output.section("Accepted Document")?;
            output.writeln(&exported)?;
        }
        // Machine formats already carry the document in the import result
        None => {}
    }

    Ok(())
}
