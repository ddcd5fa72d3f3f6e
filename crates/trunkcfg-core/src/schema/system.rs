//! Radio system schema

use serde_json::{json, Map, Value};

use super::types::{ArrayItems, Condition, FieldDefinition, SchemaSection};

/// Unique system identifier
pub const SHORT_NAME_KEY: &str = "shortName";

/// System type discriminant
pub const TYPE_KEY: &str = "type";

/// Explicit channel list of a conventional system
pub const CHANNELS_KEY: &str = "channels";

/// External channel file of a conventional system
pub const CHANNEL_FILE_KEY: &str = "channelFile";

/// Prefix shared by every conventional-family system type
pub const CONVENTIONAL_FAMILY_PREFIX: &str = "conventional";

const TRUNKED: [&str; 2] = ["p25", "smartnet"];
const CONVENTIONAL: [&str; 4] = [
    "conventional",
    "conventionalDMR",
    "conventionalP25",
    "conventionalSIGMF",
];

/// Whether a system type belongs to the conventional family
pub fn is_conventional_type(system_type: &str) -> bool {
    system_type.starts_with(CONVENTIONAL_FAMILY_PREFIX)
}

fn trunked() -> Condition {
    Condition::is_in(TYPE_KEY, TRUNKED)
}

fn conventional() -> Condition {
    Condition::is_in(TYPE_KEY, CONVENTIONAL)
}

fn smartnet() -> Condition {
    Condition::eq(TYPE_KEY, "smartnet")
}

fn custom_bandplan() -> Condition {
    Condition::eq("bandplan", "400_custom")
}

fn upload(field: FieldDefinition) -> FieldDefinition {
    field.group("upload")
}

fn recording(field: FieldDefinition) -> FieldDefinition {
    field.group("recording")
}

fn creation_template() -> Map<String, Value> {
    match json!({ "type": "p25", "enabled": true }) {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

pub(crate) fn section() -> SchemaSection {
    SchemaSection::new(
        "system",
        "Radio System",
        "Configuration for a trunked or conventional radio system",
        vec![
            FieldDefinition::string(
                SHORT_NAME_KEY,
                "Short Name",
                "A unique identifier for this system (4-6 characters recommended). Used in filenames and API calls.",
            )
            .min_length(1)
            .max_length(16)
            .pattern("^[a-zA-Z0-9_-]+$")
            .placeholder("mysys"),
            FieldDefinition::select(
                TYPE_KEY,
                "System Type",
                "The type of radio system.",
                &[
                    ("p25", "P25 Trunked"),
                    ("smartnet", "SmartNet/SmartZone Trunked"),
                    ("conventional", "Conventional (Analog)"),
                    ("conventionalDMR", "Conventional DMR"),
                    ("conventionalP25", "Conventional P25"),
                    ("conventionalSIGMF", "Conventional SigMF"),
                ],
            )
            .required(),
            FieldDefinition::boolean("enabled", "Enabled", "Enable or disable this system.")
                .default_value(true),
            FieldDefinition::array(
                "control_channels",
                "Control Channels",
                "List of control channel frequencies in Hz. Multiple frequencies provide redundancy.",
                ArrayItems::Frequency,
            )
            .required()
            .min_items(1)
            .when(trunked()),
            FieldDefinition::select(
                "modulation",
                "Modulation",
                "Control channel modulation type.",
                &[
                    ("qpsk", "QPSK (Most P25 systems)"),
                    ("fsk4", "FSK4/C4FM (Some older systems)"),
                ],
            )
            .default_value("qpsk")
            .when(trunked()),
            FieldDefinition::array(
                CHANNELS_KEY,
                "Channel Frequencies",
                "List of channel frequencies in Hz to monitor. Use this OR channelFile, not both.",
                ArrayItems::Frequency,
            )
            .min_items(1)
            .when(conventional()),
            FieldDefinition::string(
                CHANNEL_FILE_KEY,
                "Channel File",
                "Path to CSV file defining channels. Use this OR channels array, not both.",
            )
            .when(conventional()),
            FieldDefinition::number(
                "squelch",
                "Squelch Level (dB)",
                "Squelch threshold in dB. Typical values: -40 to -60. More negative = more sensitive.",
            )
            .required()
            .default_value(-50)
            .min(-100.0)
            .max(0.0)
            .when(conventional()),
            FieldDefinition::select(
                "bandplan",
                "Band Plan",
                "Frequency band plan for SmartNet systems.",
                &[
                    ("800_standard", "800 MHz Standard"),
                    ("800_reband", "800 MHz Rebanded"),
                    ("800_splinter", "800 MHz Splinter"),
                    ("400_custom", "400 MHz Custom"),
                ],
            )
            .default_value("800_standard")
            .when(smartnet()),
            FieldDefinition::frequency(
                "bandplanBase",
                "Band Plan Base Frequency",
                "Base frequency for custom 400 MHz band plan.",
            )
            .required()
            .when(smartnet())
            .when(custom_bandplan()),
            FieldDefinition::frequency(
                "bandplanHigh",
                "Band Plan High Frequency",
                "Highest channel frequency for band plan.",
            )
            .when(smartnet()),
            FieldDefinition::number(
                "bandplanSpacing",
                "Channel Spacing (Hz)",
                "Spacing between channels. Typically 25000 Hz.",
            )
            .default_value(25000)
            .when(smartnet())
            .when(custom_bandplan()),
            FieldDefinition::number(
                "bandplanOffset",
                "Band Plan Offset",
                "Offset value for frequency calculation.",
            )
            .when(smartnet())
            .when(custom_bandplan()),
            FieldDefinition::string(
                "talkgroupsFile",
                "Talkgroups File",
                "Path to CSV file with talkgroup definitions. Provides names and recording priorities.",
            )
            .placeholder("talkgroups.csv"),
            FieldDefinition::string(
                "unitTagsFile",
                "Unit Tags File",
                "Path to CSV file mapping unit IDs to names.",
            )
            .placeholder("unit_tags.csv"),
            FieldDefinition::string(
                "customFrequencyTableFile",
                "Custom Frequency Table File",
                "Path to CSV with custom frequency tables (P25).",
            )
            .placeholder("freq_table.csv")
            .advanced()
            .when(Condition::eq(TYPE_KEY, "p25")),
            upload(FieldDefinition::string(
                "apiKey",
                "OpenMHz API Key",
                "API key for OpenMHz uploads. Required if uploadServer is configured globally.",
            )),
            upload(FieldDefinition::string(
                "openmhzSystemId",
                "OpenMHz System ID",
                "System ID for OpenMHz. Defaults to shortName if not specified.",
            )),
            upload(FieldDefinition::string(
                "broadcastifyApiKey",
                "Broadcastify API Key",
                "API key for Broadcastify Calls uploads.",
            )),
            upload(
                FieldDefinition::number(
                    "broadcastifySystemId",
                    "Broadcastify System ID",
                    "Your system ID on Broadcastify Calls.",
                )
                .min(1.0),
            ),
            upload(
                FieldDefinition::string(
                    "uploadScript",
                    "Upload Script",
                    "Path to custom upload script to run after recording.",
                )
                .placeholder("/path/to/upload.sh")
                .advanced(),
            ),
            recording(
                FieldDefinition::boolean("audioArchive", "Archive Audio", "Keep audio files after upload.")
                    .default_value(true),
            ),
            recording(
                FieldDefinition::boolean(
                    "transmissionArchive",
                    "Transmission Archive",
                    "Keep individual transmission files (not just complete calls).",
                )
                .default_value(false)
                .advanced(),
            ),
            recording(
                FieldDefinition::boolean("callLog", "Call Log", "Save JSON metadata for each call.")
                    .default_value(true),
            ),
            recording(
                FieldDefinition::boolean(
                    "compressWav",
                    "Compress Audio",
                    "Convert WAV files to M4A for smaller file sizes.",
                )
                .default_value(true),
            ),
            recording(
                FieldDefinition::boolean(
                    "recordUnknown",
                    "Record Unknown Talkgroups",
                    "Record talkgroups not in the talkgroups file.",
                )
                .default_value(true),
            ),
            recording(
                FieldDefinition::boolean("hideEncrypted", "Hide Encrypted", "Hide encrypted calls from logs.")
                    .default_value(false)
                    .advanced(),
            ),
            recording(
                FieldDefinition::boolean(
                    "hideUnknownTalkgroups",
                    "Hide Unknown Talkgroups",
                    "Hide unknown talkgroups from logs.",
                )
                .default_value(false)
                .advanced(),
            ),
            recording(
                FieldDefinition::number(
                    "minDuration",
                    "Minimum Duration (seconds)",
                    "Minimum call duration to save. Shorter calls are discarded.",
                )
                .default_value(0)
                .min(0.0)
                .max(3600.0),
            ),
            recording(
                FieldDefinition::number(
                    "minTransmissionDuration",
                    "Minimum Transmission Duration (seconds)",
                    "Minimum transmission duration to include in a call.",
                )
                .default_value(0)
                .min(0.0)
                .max(60.0)
                .advanced(),
            ),
            recording(
                FieldDefinition::number(
                    "maxDuration",
                    "Maximum Duration (seconds)",
                    "Maximum call duration. Calls longer than this will be split.",
                )
                .default_value(0)
                .min(0.0)
                .max(36000.0)
                .advanced(),
            ),
            recording(
                FieldDefinition::select(
                    "talkgroupDisplayFormat",
                    "Talkgroup Display Format",
                    "How talkgroups are displayed in logs and filenames.",
                    &[("id", "ID only"), ("id_tag", "ID - Tag"), ("tag_id", "Tag (ID)")],
                )
                .default_value("id")
                .advanced(),
            ),
            FieldDefinition::number(
                "analogLevels",
                "Analog Levels",
                "Audio amplification for analog channels (1-32). Higher = louder.",
            )
            .default_value(8)
            .min(1.0)
            .max(32.0)
            .when(Condition::is_in(TYPE_KEY, ["conventional", "smartnet"])),
            FieldDefinition::number(
                "maxDev",
                "Maximum Deviation",
                "Maximum frequency deviation for analog channels. Typically 5000 for NFM.",
            )
            .default_value(5000)
            .min(1000.0)
            .max(15000.0)
            .advanced()
            .when(Condition::is_in(TYPE_KEY, ["conventional", "smartnet"])),
            FieldDefinition::number(
                "digitalLevels",
                "Digital Levels",
                "Audio amplification for digital channels (1-16).",
            )
            .default_value(1)
            .min(1.0)
            .max(16.0),
            decoder("decodeMDC", "Decode MDC-1200", "Enable MDC-1200 decoder for unit ID extraction."),
            decoder("decodeFSync", "Decode Fleet Sync", "Enable Fleet Sync decoder."),
            decoder("decodeStar", "Decode Star", "Enable Star decoder."),
            decoder("decodeTPS", "Decode TPS", "Enable Motorola TPS decoder."),
            FieldDefinition::number(
                "deemphasisTau",
                "De-emphasis Tau",
                "De-emphasis constant. 0.000750 = 750µs for NFM.",
            )
            .default_value(0.000750)
            .min(0.0)
            .max(0.001)
            .step(0.000001)
            .advanced()
            .when(Condition::eq(TYPE_KEY, "conventional")),
            FieldDefinition::number(
                "signalDetectorThreshold",
                "Signal Detector Threshold",
                "Static signal threshold (dB). Only set if needed.",
            )
            .min(-100.0)
            .max(0.0)
            .advanced()
            .when(Condition::eq(TYPE_KEY, "conventional")),
            FieldDefinition::boolean(
                "multiSite",
                "Multi-Site Mode",
                "Enable multi-site simulcast deduplication (experimental).",
            )
            .default_value(false)
            .advanced()
            .when(trunked()),
            FieldDefinition::string(
                "multiSiteSystemName",
                "Multi-Site System Name",
                "Shared identifier for all sites in this system. Required for SmartNet multi-site.",
            )
            .required()
            .when(smartnet())
            .when(Condition::eq("multiSite", true)),
            FieldDefinition::number(
                "multiSiteSystemNumber",
                "Multi-Site System Number",
                "Unique site number within the multi-site system.",
            )
            .default_value(0)
            .min(0.0)
            .max(255.0)
            .when(Condition::eq("multiSite", true)),
        ],
    )
    .with_creation_template(creation_template())
}

fn decoder(key: &str, label: &str, description: &str) -> FieldDefinition {
    FieldDefinition::boolean(key, label, description)
        .default_value(false)
        .when(Condition::eq(TYPE_KEY, "conventional"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conventional_family() {
        assert!(is_conventional_type("conventional"));
        assert!(is_conventional_type("conventionalDMR"));
        assert!(!is_conventional_type("p25"));
        assert!(!is_conventional_type("smartnet"));
    }

    #[test]
    fn test_bandplan_base_needs_both_conditions() {
        let section = section();
        let field = section.field("bandplanBase").unwrap();
        assert_eq!(field.conditions.len(), 2);
        assert!(field.is_always_required());
    }
}
