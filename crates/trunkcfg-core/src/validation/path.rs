//! Finding location paths
//!
//! Grammar:
//! - `<field>` or `global.<field>` for global settings
//! - `sources`, `systems`, `plugins` for a whole section
//! - `<section>[<i>]` for one record
//! - `<section>[<i>].<field>` for a field of one record
//! - `<...>.<field>[<j>].<key>` for a key inside an array item
//!
//! Indices are zero-based and refer to document order at validation time.

use serde::Serialize;

use crate::schema::SchemaKind;

/// Where a finding points, as far as navigation is concerned
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FindingLocation {
    pub section: Section,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// Top-level field of the record, without any nested suffix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Document section a path starts in
pub type Section = SchemaKind;

/// Path of a global field
pub fn global_field(key: &str) -> String {
    key.to_string()
}

/// Path of a whole section
pub fn section(kind: SchemaKind) -> String {
    kind.section_name().to_string()
}

/// Path of one record
pub fn record(kind: SchemaKind, index: usize) -> String {
    format!("{}[{}]", kind.section_name(), index)
}

/// Path of a field of one record
pub fn record_field(kind: SchemaKind, index: usize, key: &str) -> String {
    match kind {
        SchemaKind::Global => global_field(key),
        kind => format!("{}.{}", record(kind, index), key),
    }
}

/// Path of a key inside one item of an array field
pub fn nested(parent: &str, index: usize, key: &str) -> String {
    format!("{}[{}].{}", parent, index, key)
}

fn split_segment(path: &str) -> (&str, &str) {
    match path.find(['.', '[']) {
        Some(pos) => (&path[..pos], &path[pos..]),
        None => (path, ""),
    }
}

fn field_segment(rest: &str) -> Option<String> {
    let rest = rest.strip_prefix('.')?;
    let (field, _) = split_segment(rest);
    (!field.is_empty()).then(|| field.to_string())
}

/// Parse a finding path into its navigation target
///
/// Returns `None` for an empty path. A leading segment that is not a section
/// name is taken as a bare global field key.
pub fn parse(path: &str) -> Option<FindingLocation> {
    let (head, rest) = split_segment(path.trim());
    if head.is_empty() {
        return None;
    }

    let kind = match head {
        "global" => {
            return Some(FindingLocation {
                section: SchemaKind::Global,
                index: None,
                field: field_segment(rest),
            })
        }
        "sources" => SchemaKind::Source,
        "systems" => SchemaKind::System,
        "plugins" => SchemaKind::Plugin,
        field => {
            return Some(FindingLocation {
                section: SchemaKind::Global,
                index: None,
                field: Some(field.to_string()),
            })
        }
    };

    let mut location = FindingLocation {
        section: kind,
        index: None,
        field: None,
    };

    if let Some(indexed) = rest.strip_prefix('[') {
        if let Some(end) = indexed.find(']') {
            location.index = indexed[..end].parse().ok();
            if location.index.is_some() {
                location.field = field_segment(&indexed[end + 1..]);
            }
        }
    }

    Some(location)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_paths() {
        assert_eq!(record(SchemaKind::Source, 0), "sources[0]");
        assert_eq!(record_field(SchemaKind::System, 2, "shortName"), "systems[2].shortName");
        assert_eq!(record_field(SchemaKind::Global, 0, "ver"), "ver");
        assert_eq!(nested("plugins[0].streams", 1, "port"), "plugins[0].streams[1].port");
    }

    #[test]
    fn test_parse_record_field() {
        let loc = parse("systems[1].shortName").unwrap();
        assert_eq!(loc.section, SchemaKind::System);
        assert_eq!(loc.index, Some(1));
        assert_eq!(loc.field.as_deref(), Some("shortName"));
    }

    #[test]
    fn test_parse_nested_keeps_top_level_field() {
        let loc = parse("plugins[0].streams[3].port").unwrap();
        assert_eq!(loc.section, SchemaKind::Plugin);
        assert_eq!(loc.index, Some(0));
        assert_eq!(loc.field.as_deref(), Some("streams"));
    }

    #[test]
    fn test_parse_global_forms() {
        let bare = parse("audioStreaming").unwrap();
        assert_eq!(bare.section, SchemaKind::Global);
        assert_eq!(bare.field.as_deref(), Some("audioStreaming"));

        let prefixed = parse("global.ver").unwrap();
        assert_eq!(prefixed.section, SchemaKind::Global);
        assert_eq!(prefixed.field.as_deref(), Some("ver"));
    }

    #[test]
    fn test_parse_section_only() {
        let loc = parse("sources").unwrap();
        assert_eq!(loc.section, SchemaKind::Source);
        assert_eq!(loc.index, None);
        assert_eq!(loc.field, None);
        assert!(parse("").is_none());
    }

    #[test]
    fn test_parse_bad_index() {
        let loc = parse("sources[x].gain").unwrap();
        assert_eq!(loc.index, None);
        assert_eq!(loc.field, None);
    }
}
