//! Global settings schema

use super::types::{Condition, FieldDefinition, SchemaSection};

/// Key of the document version field
pub const VERSION_KEY: &str = "ver";

/// The only accepted document version
pub const REQUIRED_VERSION: u64 = 2;

/// Global flag that streaming plugins depend on
pub const AUDIO_STREAMING_KEY: &str = "audioStreaming";

pub(crate) fn section() -> SchemaSection {
    SchemaSection::new(
        "global",
        "Global Settings",
        "Top-level configuration options that apply to all systems",
        vec![
            FieldDefinition::number(
                VERSION_KEY,
                "Config Version",
                "Must be set to 2. Required for Trunk Recorder to start.",
            )
            .required()
            .default_value(REQUIRED_VERSION)
            .min(2.0)
            .max(2.0),
            FieldDefinition::select(
                "defaultMode",
                "Default Mode",
                "Recording mode for talkgroups not listed in the talkgroups file.",
                &[("digital", "Digital"), ("analog", "Analog")],
            )
            .default_value("digital"),
            FieldDefinition::string(
                "tempDir",
                "Temp Directory",
                "Directory for recording buffers. Defaults to /dev/shm on Linux or current directory on macOS.",
            )
            .placeholder("/dev/shm"),
            FieldDefinition::string(
                "captureDir",
                "Capture Directory",
                "Directory where completed recordings are saved.",
            )
            .placeholder("/home/user/recordings"),
            FieldDefinition::number(
                "callTimeout",
                "Call Timeout",
                "Seconds of inactivity before a call is considered complete and saved.",
            )
            .default_value(3)
            .min(1.0)
            .max(30.0),
            FieldDefinition::string(
                "uploadServer",
                "OpenMHz Upload Server",
                "URL for OpenMHz upload endpoint (e.g., https://api.openmhz.com).",
            )
            .placeholder("https://api.openmhz.com"),
            FieldDefinition::string(
                "broadcastifyCallsServer",
                "Broadcastify Calls Server",
                "URL for Broadcastify Calls upload endpoint.",
            )
            .placeholder("https://api.broadcastify.com/calls"),
            FieldDefinition::boolean(
                "broadcastifySslVerifyDisable",
                "Disable Broadcastify SSL Verify",
                "Disable SSL certificate verification for Broadcastify uploads.",
            )
            .default_value(false)
            .advanced(),
            FieldDefinition::boolean("consoleLog", "Console Logging", "Enable console logging output.")
                .default_value(true),
            FieldDefinition::boolean("logFile", "File Logging", "Enable file-based logging.")
                .default_value(false),
            FieldDefinition::string("logDir", "Log Directory", "Directory for log files.")
                .default_value("logs/")
                .placeholder("logs/")
                .when(Condition::eq("logFile", true)),
            FieldDefinition::select(
                "logLevel",
                "Log Level",
                "Verbosity of logging output.",
                &[
                    ("trace", "Trace (Most Verbose)"),
                    ("debug", "Debug"),
                    ("info", "Info (Default)"),
                    ("warning", "Warning"),
                    ("error", "Error"),
                    ("fatal", "Fatal (Least Verbose)"),
                ],
            )
            .default_value("info")
            .advanced(),
            FieldDefinition::select(
                "frequencyFormat",
                "Frequency Format",
                "Display format for frequencies in logs and console.",
                &[("exp", "Exponential"), ("mhz", "MHz"), ("hz", "Hz")],
            )
            .default_value("exp")
            .advanced(),
            FieldDefinition::boolean(
                AUDIO_STREAMING_KEY,
                "Audio Streaming",
                "Enable audio streaming for plugins like simplestream. Required for streaming plugins.",
            )
            .default_value(false),
            FieldDefinition::boolean(
                "softVocoder",
                "Software Vocoder",
                "Use OP25 software vocoder for P25 Phase 1. Useful if you don't have hardware vocoder support.",
            )
            .default_value(false)
            .advanced(),
            FieldDefinition::boolean(
                "newCallFromUpdate",
                "New Call from Update",
                "Allow UPDATE messages to start new calls.",
            )
            .default_value(true)
            .advanced(),
            FieldDefinition::boolean(
                "recordUUVCalls",
                "Record Unit-to-Unit Calls",
                "Record Unit-to-Unit Voice calls (P25 systems only).",
            )
            .default_value(true)
            .advanced(),
            FieldDefinition::number(
                "controlWarnRate",
                "Control Channel Warning Rate",
                "Decode rate threshold (per second) below which warnings are shown. Use -1 to always display warnings.",
            )
            .default_value(10)
            .min(-1.0)
            .max(100.0)
            .advanced(),
            FieldDefinition::number(
                "controlRetuneLimit",
                "Control Channel Retune Limit",
                "Maximum retune attempts for control channel. 0 = unlimited.",
            )
            .default_value(0)
            .min(0.0)
            .advanced(),
            FieldDefinition::boolean(
                "statusAsString",
                "Status as String",
                "Display status values as strings instead of numeric codes.",
            )
            .default_value(true)
            .advanced(),
            FieldDefinition::string("statusServer", "Status Server", "WebSocket URL for status updates.")
                .placeholder("ws://localhost:3005")
                .advanced(),
            FieldDefinition::boolean(
                "broadcastSignals",
                "Broadcast Signals",
                "Broadcast decoded signals to status server.",
            )
            .default_value(true)
            .advanced(),
            FieldDefinition::boolean(
                "debugRecorder",
                "Debug Recorder",
                "Attach debug recorder to sources for monitoring.",
            )
            .default_value(true)
            .advanced(),
            FieldDefinition::number(
                "debugRecorderPort",
                "Debug Recorder Port",
                "Starting UDP port for debug recorders.",
            )
            .default_value(1234)
            .min(1024.0)
            .max(65535.0)
            .advanced()
            .when(Condition::eq("debugRecorder", true)),
            FieldDefinition::string(
                "debugRecorderAddress",
                "Debug Recorder Address",
                "Network address for debug monitoring.",
            )
            .default_value("127.0.0.1")
            .placeholder("127.0.0.1")
            .advanced()
            .when(Condition::eq("debugRecorder", true)),
        ],
    )
}
