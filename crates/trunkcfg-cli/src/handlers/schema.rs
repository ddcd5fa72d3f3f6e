//! Schema command handler

use crate::cli::SchemaArgs;
use crate::error::Result;
use crate::output::OutputWriter;
use trunkcfg_core::{registry, SchemaKind, SchemaSection};

const ALL_KINDS: [SchemaKind; 4] = [
    SchemaKind::Global,
    SchemaKind::Source,
    SchemaKind::System,
    SchemaKind::Plugin,
];

/// Handle the schema command
pub fn handle_schema(args: SchemaArgs, output: &mut OutputWriter) -> Result<()> {
    let sections = select_sections(&args)?
        .into_iter()
        .map(|section| filter_advanced(section, args.advanced))
        .collect::<Vec<_>>();

    if !output.is_human() {
        return match sections.as_slice() {
            [section] => output.schema_section(section),
            _ => output.data(&sections),
        };
    }

    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            output.writeln("")?;
        }
        output.schema_section(section)?;
    }

    let shows_plugins = args.plugin.is_none()
        && args.section.map_or(true, |s| SchemaKind::from(s) == SchemaKind::Plugin);
    if shows_plugins {
        let names = registry().plugin_kinds().collect::<Vec<_>>().join(", ");
        output.info(&format!("Plugin extensions: {} (show one with --plugin NAME)", names))?;
    }
    if args.advanced {
        output.info("Fields marked * are advanced")?;
    } else {
        output.info("Advanced fields are hidden; pass --advanced to include them")?;
    }

    Ok(())
}

fn select_sections(args: &SchemaArgs) -> Result<Vec<&'static SchemaSection>> {
    let registry = registry();

    if let Some(name) = &args.plugin {
        return Ok(vec![registry.require_plugin_schema(name)?]);
    }

    Ok(match args.section {
        Some(target) => vec![registry.schema(target.into())],
        None => ALL_KINDS.iter().map(|kind| registry.schema(*kind)).collect(),
    })
}

fn filter_advanced(section: &SchemaSection, include_advanced: bool) -> SchemaSection {
    SchemaSection {
        fields: section
            .fields
            .iter()
            .filter(|field| include_advanced || !field.advanced)
            .cloned()
            .collect(),
        ..section.clone()
    }
}
