//! Build script for bellows-firmware
//!
//! - Sets up linker search paths and scripts for memory.x
//! - Validates ventilator.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Entries in the pump ramp curve
const RAMP_CURVE_LEN: usize = 13;

/// Value types the firmware's line reader accepts
#[derive(Clone, Copy)]
enum Kind {
    U8,
    U16,
    U32,
    Bool,
    Curve,
}

/// Every section and key the firmware understands, with its type
const SCHEMA: &[(&str, &[(&str, Kind)])] = &[
    (
        "vessel",
        &[
            ("height_cm", Kind::U16),
            ("tidal_volume_cm", Kind::U16),
            ("safety_margin_cm", Kind::U16),
        ],
    ),
    ("ramp", &[("curve", Kind::Curve), ("step_ticks", Kind::U8)]),
    (
        "button",
        &[("debounce_ms", Kind::U32), ("active_high", Kind::Bool)],
    ),
    (
        "timing",
        &[("tick_interval_ms", Kind::U32), ("echo_timeout_us", Kind::U32)],
    ),
    (
        "safety",
        &[
            ("close_valves_on_stop", Kind::Bool),
            ("timeout_warn_after", Kind::U8),
        ],
    ),
];

/// Keys that must be positive when present
const NONZERO: &[(&str, &str)] = &[
    ("ramp", "step_ticks"),
    ("button", "debounce_ms"),
    ("timing", "tick_interval_ms"),
    ("timing", "echo_timeout_us"),
];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate ventilator.toml configuration at compile time
fn validate_config() {
    // Re-run if ventilator.toml changes
    println!("cargo:rerun-if-changed=ventilator.toml");

    let config_path = Path::new("ventilator.toml");

    // Check if config file exists
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: ventilator.toml not found!                               ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds ventilator.toml at build time.              ║\n\
            ║  Please create one in the bellows-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    // Read the config file
    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read ventilator.toml                           ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in ventilator.toml                   ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_line_grammar(&config_content, &mut errors);
    validate_schema(&config, &mut errors);
    validate_vessel(&config, &mut errors);
    for (section, key) in NONZERO {
        validate_nonzero(&config, section, key, &mut errors);
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid values in ventilator.toml                        ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=ventilator.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check the subset of TOML the firmware's line reader understands
///
/// One `[section]` or `key = value` per line; values are `true`, `false`,
/// a decimal integer, or an integer array closed on the same line.
fn validate_line_grammar(content: &str, errors: &mut Vec<String>) {
    for (index, raw) in content.lines().enumerate() {
        let line_no = index + 1;
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        }
        .trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') {
            if !line.ends_with(']') {
                errors.push(format!("line {}: malformed section header", line_no));
            }
            continue;
        }

        let Some((_, value)) = line.split_once('=') else {
            errors.push(format!("line {}: expected `key = value`", line_no));
            continue;
        };
        let value = value.trim();

        let readable = match value {
            "true" | "false" => true,
            v if v.starts_with('[') => {
                v.ends_with(']')
                    && v[1..v.len() - 1]
                        .split(',')
                        .map(str::trim)
                        .filter(|item| !item.is_empty())
                        .all(is_decimal)
            }
            v => is_decimal(v),
        };

        if !readable {
            errors.push(format!(
                "line {}: value must be true/false, a decimal integer, or a one-line array",
                line_no
            ));
        }
    }
}

/// Plain decimal digits, `_` separators allowed
fn is_decimal(value: &str) -> bool {
    value.bytes().any(|b| b.is_ascii_digit())
        && value.bytes().all(|b| b.is_ascii_digit() || b == b'_')
}

/// Check every section, key and value type against the firmware's fields
fn validate_schema(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(table) = config.as_table() else {
        return;
    };

    for (name, value) in table {
        let Some((_, keys)) = SCHEMA.iter().find(|(section, _)| *section == name.as_str()) else {
            errors.push(format!("unknown section [{}]", name));
            continue;
        };
        let Some(entries) = value.as_table() else {
            errors.push(format!("[{}] must be a table", name));
            continue;
        };

        for (key, value) in entries {
            match keys.iter().find(|(known, _)| *known == key.as_str()) {
                Some((_, kind)) => validate_value(name, key, value, *kind, errors),
                None => errors.push(format!("[{}] unknown key `{}`", name, key)),
            }
        }
    }
}

fn validate_value(section: &str, key: &str, value: &toml::Value, kind: Kind, errors: &mut Vec<String>) {
    let max = match kind {
        Kind::U8 => i64::from(u8::MAX),
        Kind::U16 => i64::from(u16::MAX),
        Kind::U32 => i64::from(u32::MAX),
        Kind::Bool => {
            if !value.is_bool() {
                errors.push(format!("[{}] {} must be true or false", section, key));
            }
            return;
        }
        Kind::Curve => {
            validate_curve(section, key, value, errors);
            return;
        }
    };

    match value.as_integer() {
        Some(v) if (0..=max).contains(&v) => {}
        _ => errors.push(format!("[{}] {} must be an integer 0-{}", section, key, max)),
    }
}

/// Exactly RAMP_CURVE_LEN strictly ascending bytes
fn validate_curve(section: &str, key: &str, value: &toml::Value, errors: &mut Vec<String>) {
    let Some(values) = value.as_array() else {
        errors.push(format!("[{}] {} must be an array", section, key));
        return;
    };

    let levels: Vec<i64> = values.iter().filter_map(toml::Value::as_integer).collect();
    if values.len() != RAMP_CURVE_LEN || levels.len() != RAMP_CURVE_LEN {
        errors.push(format!(
            "[{}] {} must hold exactly {} integers",
            section, key, RAMP_CURVE_LEN
        ));
    } else if levels.iter().any(|l| !(0..=255).contains(l)) {
        errors.push(format!("[{}] {} values must be 0-255", section, key));
    } else if !levels.windows(2).all(|w| w[0] < w[1]) {
        errors.push(format!("[{}] {} must be strictly ascending", section, key));
    }
}

/// Read an integer key, falling back to the firmware default
fn int_or(config: &toml::Value, section: &str, key: &str, default: i64) -> i64 {
    config
        .get(section)
        .and_then(|s| s.get(key))
        .and_then(toml::Value::as_integer)
        .unwrap_or(default)
}

/// Check the level marks: low < center < high < height
fn validate_vessel(config: &toml::Value, errors: &mut Vec<String>) {
    let height = int_or(config, "vessel", "height_cm", 20);
    let tidal = int_or(config, "vessel", "tidal_volume_cm", 12);
    let safety = int_or(config, "vessel", "safety_margin_cm", 4);

    let high = height - safety;
    let low = high - tidal;
    let center = height / 2;
    if !(0 <= low && low < center && center < high && high < height) {
        errors.push(format!(
            "[vessel] marks must satisfy low < center < high < height (got {} < {} < {} < {})",
            low, center, high, height
        ));
    }
}

/// Check that an optional integer key is positive when present
fn validate_nonzero(config: &toml::Value, section: &str, key: &str, errors: &mut Vec<String>) {
    if let Some(value) = config.get(section).and_then(|s| s.get(key)) {
        if value.as_integer() == Some(0) {
            errors.push(format!("[{}] {} must be greater than zero", section, key));
        }
    }
}
