//! Minimal TOML reader for ventilator configuration
//!
//! Handles only the subset used by `ventilator.toml` and needs no heap:
//!
//! - `[section]` headers
//! - `key = value` pairs (integer, boolean)
//! - single-line integer arrays: `curve = [1, 3, 8]`
//! - comments (`# ...`), whole-line or trailing
//!
//! Keys that are left out keep their defaults. Unknown sections or keys
//! are rejected so a typo never silently falls back to a default.

use super::types::{ConfigError, ControlConfig, RAMP_CURVE_LEN};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header (1-based line number)
    InvalidSection(usize),
    /// Key not valid in its section
    UnknownKey(usize),
    /// Line is not `key = value`
    InvalidLine(usize),
    /// Value has the wrong type or is out of range
    InvalidValue(usize),
    /// Ramp curve does not hold exactly [`RAMP_CURVE_LEN`] entries
    CurveLength(usize),
    /// Document parsed but the values are inconsistent
    Invalid(ConfigError),
}

impl From<ConfigError> for ParseError {
    fn from(err: ConfigError) -> Self {
        ParseError::Invalid(err)
    }
}

impl From<ParseError> for ConfigError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Invalid(inner) => inner,
            _ => ConfigError::Parse,
        }
    }
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Vessel,
    Ramp,
    Button,
    Timing,
    Safety,
}

/// Parse and validate a configuration document
pub fn parse_config(input: &str) -> Result<ControlConfig, ParseError> {
    let mut config = ControlConfig::default();
    let mut section = Section::Root;

    for (index, raw) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = strip_comment(raw).trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') {
            section = parse_section_header(line).ok_or(ParseError::InvalidSection(line_no))?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine(line_no))?;
        apply_value(&mut config, section, key, value, line_no)?;
    }

    config.validate()?;
    Ok(config)
}

impl ControlConfig {
    /// Parse and validate a configuration document without a heap
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        Ok(parse_config(source)?)
    }
}

/// Drop a trailing `# comment`
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Parse a header like `[vessel]`
fn parse_section_header(line: &str) -> Option<Section> {
    let name = line.strip_prefix('[')?.strip_suffix(']')?.trim();
    match name {
        "vessel" => Some(Section::Vessel),
        "ramp" => Some(Section::Ramp),
        "button" => Some(Section::Button),
        "timing" => Some(Section::Timing),
        "safety" => Some(Section::Safety),
        _ => None,
    }
}

/// Split `key = value`
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn apply_value(
    config: &mut ControlConfig,
    section: Section,
    key: &str,
    value: &str,
    line: usize,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Vessel, "height_cm") => config.vessel.height_cm = parse_int(value, line)?,
        (Section::Vessel, "tidal_volume_cm") => {
            config.vessel.tidal_volume_cm = parse_int(value, line)?
        }
        (Section::Vessel, "safety_margin_cm") => {
            config.vessel.safety_margin_cm = parse_int(value, line)?
        }
        (Section::Ramp, "curve") => config.ramp.curve = parse_curve(value, line)?,
        (Section::Ramp, "step_ticks") => config.ramp.step_ticks = parse_int(value, line)?,
        (Section::Button, "debounce_ms") => config.button.debounce_ms = parse_int(value, line)?,
        (Section::Button, "active_high") => config.button.active_high = parse_bool(value, line)?,
        (Section::Timing, "tick_interval_ms") => {
            config.timing.tick_interval_ms = parse_int(value, line)?
        }
        (Section::Timing, "echo_timeout_us") => {
            config.timing.echo_timeout_us = parse_int(value, line)?
        }
        (Section::Safety, "close_valves_on_stop") => {
            config.safety.close_valves_on_stop = parse_bool(value, line)?
        }
        (Section::Safety, "timeout_warn_after") => {
            config.safety.timeout_warn_after = parse_int(value, line)?
        }
        _ => return Err(ParseError::UnknownKey(line)),
    }
    Ok(())
}

/// Parse a plain decimal integer, allowing `_` separators
fn parse_int<T: core::str::FromStr>(value: &str, line: usize) -> Result<T, ParseError> {
    if !value.bytes().all(|b| b.is_ascii_digit() || b == b'_') {
        return Err(ParseError::InvalidValue(line));
    }

    let mut digits = [0u8; 24];
    let mut len = 0;

    for byte in value.bytes().filter(|b| *b != b'_') {
        let slot = digits.get_mut(len).ok_or(ParseError::InvalidValue(line))?;
        *slot = byte;
        len += 1;
    }

    core::str::from_utf8(&digits[..len])
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(ParseError::InvalidValue(line))
}

fn parse_bool(value: &str, line: usize) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue(line)),
    }
}

/// Parse `[a, b, c, ...]` into a full ramp curve
fn parse_curve(value: &str, line: usize) -> Result<[u8; RAMP_CURVE_LEN], ParseError> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or(ParseError::InvalidValue(line))?;

    let mut curve = [0u8; RAMP_CURVE_LEN];
    let mut count = 0;

    for item in inner.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let slot = curve.get_mut(count).ok_or(ParseError::CurveLength(line))?;
        *slot = parse_int(item, line)?;
        count += 1;
    }

    if count != RAMP_CURVE_LEN {
        return Err(ParseError::CurveLength(line));
    }

    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_RAMP_CURVE;

    const SHIPPED: &str = r#"
# Bellows configuration

[vessel]
height_cm = 20
tidal_volume_cm = 12
safety_margin_cm = 4   # gap to the sensor

[ramp]
curve = [1, 3, 8, 18, 38, 78, 128, 177, 217, 237, 247, 252, 255]
step_ticks = 1

[button]
debounce_ms = 150
active_high = false

[timing]
tick_interval_ms = 10
echo_timeout_us = 10_000

[safety]
close_valves_on_stop = true
timeout_warn_after = 3
"#;

    #[test]
    fn test_parse_full_document() {
        let config = parse_config(SHIPPED).unwrap();

        assert_eq!(config.vessel.height_cm, 20);
        assert_eq!(config.ramp.curve, DEFAULT_RAMP_CURVE);
        assert!(!config.button.active_high);
        assert_eq!(config.timing.echo_timeout_us, 10_000);
        assert!(config.safety.close_valves_on_stop);
        assert_eq!(config.safety.timeout_warn_after, 3);
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(parse_config("").unwrap(), ControlConfig::default());
        assert_eq!(parse_config("# nothing\n\n").unwrap(), ControlConfig::default());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = parse_config("[vessel]\nheight_cm = 30\ntidal_volume_cm = 16\n").unwrap();

        assert_eq!(config.vessel.height_cm, 30);
        assert_eq!(config.vessel.tidal_volume_cm, 16);
        assert_eq!(config.vessel.safety_margin_cm, 4);
        assert_eq!(config.button, ControlConfig::default().button);
    }

    #[test]
    fn test_unknown_section_and_key() {
        assert_eq!(
            parse_config("[pumps]\n"),
            Err(ParseError::InvalidSection(1))
        );
        assert_eq!(
            parse_config("[vessel]\ndepth_cm = 3\n"),
            Err(ParseError::UnknownKey(2))
        );
        // Keys before any section belong nowhere
        assert_eq!(parse_config("height_cm = 20\n"), Err(ParseError::UnknownKey(1)));
    }

    #[test]
    fn test_bad_values() {
        assert_eq!(
            parse_config("[button]\nactive_high = yes\n"),
            Err(ParseError::InvalidValue(2))
        );
        assert_eq!(
            parse_config("[vessel]\nheight_cm = -1\n"),
            Err(ParseError::InvalidValue(2))
        );
        assert_eq!(
            parse_config("[ramp]\ncurve = [1, 2, 3]\n"),
            Err(ParseError::CurveLength(2))
        );
        assert_eq!(parse_config("[ramp]\nstep_ticks\n"), Err(ParseError::InvalidLine(2)));
    }

    #[test]
    fn test_misspelled_key_rejected() {
        assert_eq!(
            parse_config("[vessel]\nheight_cm = 20\ntidal_volume_cm = 12\nsafety_margin = 4\n"),
            Err(ParseError::UnknownKey(4))
        );
    }

    #[test]
    fn test_multiline_array_rejected() {
        let doc = "[ramp]\ncurve = [\n  1, 3, 8, 18, 38, 78, 128,\n  177, 217, 237, 247, 252, 255,\n]\n";
        assert_eq!(parse_config(doc), Err(ParseError::InvalidValue(2)));
    }

    #[test]
    fn test_values_outside_field_width_rejected() {
        assert_eq!(
            parse_config("[ramp]\nstep_ticks = 300\n"),
            Err(ParseError::InvalidValue(2))
        );
        assert_eq!(
            parse_config("[safety]\ntimeout_warn_after = 256\n"),
            Err(ParseError::InvalidValue(2))
        );
        assert_eq!(
            parse_config("[vessel]\nheight_cm = 70000\n"),
            Err(ParseError::InvalidValue(2))
        );
        assert_eq!(
            parse_config("[ramp]\ncurve = [1, 3, 8, 18, 38, 78, 128, 177, 217, 237, 247, 252, 256]\n"),
            Err(ParseError::InvalidValue(2))
        );
        // Upper bounds themselves are fine
        let config = parse_config("[ramp]\nstep_ticks = 255\n[safety]\ntimeout_warn_after = 0\n").unwrap();
        assert_eq!(config.ramp.step_ticks, 255);
        assert_eq!(config.safety.timeout_warn_after, 0);
    }

    #[test]
    fn test_non_decimal_literals_rejected() {
        assert_eq!(
            parse_config("[timing]\ntick_interval_ms = 0x10\n"),
            Err(ParseError::InvalidValue(2))
        );
        assert_eq!(
            parse_config("[timing]\ntick_interval_ms = \"10\"\n"),
            Err(ParseError::InvalidValue(2))
        );
        assert_eq!(
            parse_config("[timing]\ntick_interval_ms = +10\n"),
            Err(ParseError::InvalidValue(2))
        );
    }

    #[test]
    fn test_zero_debounce_rejected() {
        assert_eq!(
            parse_config("[button]\ndebounce_ms = 0\n"),
            Err(ParseError::Invalid(ConfigError::ZeroDebounce))
        );
    }

    #[test]
    fn test_inconsistent_values_rejected() {
        assert_eq!(
            parse_config("[vessel]\ntidal_volume_cm = 20\n"),
            Err(ParseError::Invalid(ConfigError::InvalidThresholds))
        );
        assert_eq!(
            ControlConfig::parse("[timing]\ntick_interval_ms = 0\n"),
            Err(ConfigError::ZeroTickInterval)
        );
        assert_eq!(
            ControlConfig::parse("[ramp]\nstep_ticks = x\n"),
            Err(ConfigError::Parse)
        );
    }
}
