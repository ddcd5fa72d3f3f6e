//! SDR source schema

use serde_json::{json, Map, Value};

use super::types::{Condition, FieldDefinition, SchemaSection};

/// SDR driver selector, the sibling most source conditions test
pub const DRIVER_KEY: &str = "driver";

/// Absolute frequency correction in Hz
pub const ERROR_KEY: &str = "error";

/// Frequency correction in parts per million
pub const PPM_KEY: &str = "ppm";

const HARDWARE_DRIVERS: [&str; 2] = ["osmosdr", "usrp"];
const TUNED_DRIVERS: [&str; 3] = ["osmosdr", "usrp", "iqfile"];
const FILE_DRIVERS: [&str; 2] = ["sigmffile", "iqfile"];

fn hardware() -> Condition {
    Condition::is_in(DRIVER_KEY, HARDWARE_DRIVERS)
}

fn gain_stage(key: &str, label: &str, description: &str) -> FieldDefinition {
    FieldDefinition::number(key, label, description)
        .min(0.0)
        .max(100.0)
        .advanced()
        .when(Condition::eq(DRIVER_KEY, "osmosdr"))
}

fn creation_template() -> Map<String, Value> {
    let template = json!({
        "driver": "osmosdr",
        "center": 0,
        "rate": 2048000,
        "gain": 30,
        "digitalRecorders": 2,
        "enabled": true
    });
    match template {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

pub(crate) fn section() -> SchemaSection {
    SchemaSection::new(
        "source",
        "SDR Source",
        "Configuration for a Software Defined Radio device",
        vec![
            FieldDefinition::select(
                DRIVER_KEY,
                "Driver",
                "SDR driver type. Use \"osmosdr\" for RTL-SDR, HackRF, AirSpy. Use \"usrp\" for Ettus USRP devices.",
                &[
                    ("osmosdr", "OsmoSDR (RTL-SDR, HackRF, AirSpy, etc.)"),
                    ("usrp", "USRP (Ettus Research)"),
                    ("sigmffile", "SigMF File"),
                    ("iqfile", "IQ File"),
                ],
            )
            .required(),
            FieldDefinition::string(
                "device",
                "Device Identifier",
                "Device string in osmosdr format (e.g., \"rtl=0\" or \"rtl=00000001\" for serial). Only needed if using multiple devices.",
            )
            .placeholder("rtl=0")
            .when(hardware()),
            FieldDefinition::frequency(
                "center",
                "Center Frequency",
                "Center frequency in Hz. Should be set to cover the channels you want to monitor without placing any channel at the exact center.",
            )
            .required()
            .when(Condition::is_in(DRIVER_KEY, TUNED_DRIVERS)),
            FieldDefinition::number(
                "rate",
                "Sample Rate",
                "Sample rate in samples per second. Common values: 2048000, 2400000, 8000000.",
            )
            .required()
            .min(240_000.0)
            .max(20_000_000.0)
            .placeholder("2048000")
            .when(Condition::is_in(DRIVER_KEY, TUNED_DRIVERS)),
            FieldDefinition::number(
                "gain",
                "RF Gain",
                "RF gain setting. Optimal value depends on your SDR and antenna. Use GQRX to find a good value.",
            )
            .required()
            .min(0.0)
            .max(100.0)
            .when(hardware()),
            FieldDefinition::number(
                ERROR_KEY,
                "Frequency Error (Hz)",
                "Frequency correction in Hz. Use this OR ppm, not both. Positive if SDR tunes high, negative if low.",
            )
            .default_value(0)
            .when(hardware()),
            FieldDefinition::number(
                PPM_KEY,
                "PPM Correction",
                "Frequency correction in parts per million. Use this OR error (Hz), not both.",
            )
            .default_value(0)
            .when(hardware()),
            FieldDefinition::boolean(
                "agc",
                "Automatic Gain Control",
                "Enable automatic gain control. Not recommended for most applications.",
            )
            .default_value(false)
            .advanced()
            .when(hardware()),
            FieldDefinition::number(
                "digitalRecorders",
                "Digital Recorders",
                "Number of digital recorders for this source. Each recorder can capture one digital channel simultaneously.",
            )
            .min(0.0)
            .max(32.0)
            .default_value(0),
            FieldDefinition::number(
                "analogRecorders",
                "Analog Recorders",
                "Number of analog recorders for this source. Each recorder can capture one analog channel simultaneously.",
            )
            .min(0.0)
            .max(32.0)
            .default_value(0),
            FieldDefinition::number(
                "debugRecorders",
                "Debug Recorders",
                "Number of debug recorders for this source.",
            )
            .min(0.0)
            .max(10.0)
            .default_value(0)
            .advanced(),
            FieldDefinition::boolean("enabled", "Enabled", "Enable or disable this source.")
                .default_value(true),
            FieldDefinition::string(
                "sigmfMeta",
                "SigMF Metadata File",
                "Path to the SigMF metadata file (.sigmf-meta).",
            )
            .required()
            .when(Condition::eq(DRIVER_KEY, "sigmffile")),
            FieldDefinition::string(
                "sigmfData",
                "SigMF Data File",
                "Path to the SigMF data file (.sigmf-data).",
            )
            .required()
            .when(Condition::eq(DRIVER_KEY, "sigmffile")),
            FieldDefinition::string("iqfile", "IQ File Path", "Path to the IQ recording file.")
                .required()
                .when(Condition::eq(DRIVER_KEY, "iqfile")),
            FieldDefinition::boolean(
                "repeat",
                "Repeat Playback",
                "Loop the file when it reaches the end.",
            )
            .default_value(false)
            .when(Condition::is_in(DRIVER_KEY, FILE_DRIVERS)),
            gain_stage("ifGain", "IF Gain", "Intermediate frequency gain. For AirSpy and HackRF."),
            gain_stage("bbGain", "Baseband Gain", "Baseband gain. For HackRF."),
            gain_stage("mixGain", "Mix Gain", "Mixer gain. For AirSpy."),
            gain_stage("lnaGain", "LNA Gain", "Low-noise amplifier gain. For AirSpy and BladeRF."),
            gain_stage("vga1Gain", "VGA1 Gain", "VGA1 gain stage. For BladeRF."),
            gain_stage("vga2Gain", "VGA2 Gain", "VGA2 gain stage. For BladeRF."),
            FieldDefinition::string(
                "antenna",
                "Antenna Port",
                "Antenna port selection (e.g., \"TX/RX\", \"RX2\"). USRP only.",
            )
            .placeholder("TX/RX")
            .advanced()
            .when(Condition::eq(DRIVER_KEY, "usrp")),
            FieldDefinition::number(
                "signalDetectorThreshold",
                "Signal Detector Threshold",
                "Static signal detector threshold in dB. Only set if needed.",
            )
            .min(-100.0)
            .max(0.0)
            .advanced(),
        ],
    )
    .with_creation_template(creation_template())
}
