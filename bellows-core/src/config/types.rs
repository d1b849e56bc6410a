//! Configuration type definitions
//!
//! With the `toml` feature the configuration can be parsed from a TOML
//! document; any key left out keeps its default.

use super::Thresholds;

#[cfg(feature = "serde")]
use serde::Deserialize;

/// Number of entries in the pump ramp curve
pub const RAMP_CURVE_LEN: usize = 13;

/// Soft-start curve: ramp index to PWM drive level
///
/// Spacing is tight at both ends and wide in the middle so the pump eases
/// in and out of full power.
pub const DEFAULT_RAMP_CURVE: [u8; RAMP_CURVE_LEN] =
    [1, 3, 8, 18, 38, 78, 128, 177, 217, 237, 247, 252, 255];

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Marks do not satisfy low < center < high < vessel height
    InvalidThresholds,
    /// Ramp curve is not strictly ascending
    RampNotAscending,
    /// Ramp step interval is zero
    ZeroRampStep,
    /// Button debounce window is zero
    ZeroDebounce,
    /// Tick interval is zero
    ZeroTickInterval,
    /// Echo timeout is zero
    ZeroEchoTimeout,
    /// TOML document could not be parsed
    Parse,
}

/// Vessel geometry (all values in cm)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct VesselConfig {
    /// Distance from the sensor face to the vessel floor
    pub height_cm: u16,
    /// Water excursion between the low and high marks
    pub tidal_volume_cm: u16,
    /// Gap kept between the high mark and the sensor
    pub safety_margin_cm: u16,
}

impl Default for VesselConfig {
    fn default() -> Self {
        Self {
            height_cm: 20,
            tidal_volume_cm: 12,
            safety_margin_cm: 4,
        }
    }
}

/// Pump ramp configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct RampConfig {
    /// Drive level for each ramp index
    pub curve: [u8; RAMP_CURVE_LEN],
    /// Ticks per ramp index step (1 = step every tick)
    pub step_ticks: u8,
}

impl Default for RampConfig {
    fn default() -> Self {
        Self {
            curve: DEFAULT_RAMP_CURVE,
            step_ticks: 1,
        }
    }
}

/// Start/stop button configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ButtonConfig {
    /// Time the raw reading must hold before it is accepted
    pub debounce_ms: u32,
    /// Pressed reads high (true) or low (false, pull-up wiring)
    pub active_high: bool,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 150,
            active_high: true,
        }
    }
}

/// Control loop timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct TimingConfig {
    /// Delay after each tick
    pub tick_interval_ms: u32,
    /// Longest wait for an echo before giving up
    pub echo_timeout_us: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 10,
            echo_timeout_us: 10_000,
        }
    }
}

/// Stop and fault behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct SafetyConfig {
    /// Close both valves when the cycle is stopped
    ///
    /// Off by default: valves hold whatever the last phase set.
    pub close_valves_on_stop: bool,
    /// Consecutive echo timeouts before a vessel is reported degraded
    pub timeout_warn_after: u8,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            close_valves_on_stop: false,
            timeout_warn_after: 5,
        }
    }
}

/// Complete controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ControlConfig {
    pub vessel: VesselConfig,
    pub ramp: RampConfig,
    pub button: ButtonConfig,
    pub timing: TimingConfig,
    pub safety: SafetyConfig,
}

impl ControlConfig {
    /// Check every invariant the controller relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        Thresholds::from_config(&self.vessel)?;

        if !self.ramp.curve.windows(2).all(|w| w[0] < w[1]) {
            return Err(ConfigError::RampNotAscending);
        }
        if self.ramp.step_ticks == 0 {
            return Err(ConfigError::ZeroRampStep);
        }
        if self.button.debounce_ms == 0 {
            return Err(ConfigError::ZeroDebounce);
        }
        if self.timing.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.timing.echo_timeout_us == 0 {
            return Err(ConfigError::ZeroEchoTimeout);
        }

        Ok(())
    }

    /// Parse and validate a TOML document
    #[cfg(feature = "toml")]
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: ControlConfig = toml::from_str(source).map_err(|_| ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(ControlConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_flat_curve_rejected() {
        let mut config = ControlConfig::default();
        config.ramp.curve[5] = config.ramp.curve[4];
        assert_eq!(config.validate(), Err(ConfigError::RampNotAscending));
    }

    #[test]
    fn test_zero_intervals_rejected() {
        let mut config = ControlConfig::default();
        config.ramp.step_ticks = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroRampStep));

        let mut config = ControlConfig::default();
        config.button.debounce_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroDebounce));

        let mut config = ControlConfig::default();
        config.timing.tick_interval_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTickInterval));

        let mut config = ControlConfig::default();
        config.timing.echo_timeout_us = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroEchoTimeout));
    }

    #[test]
    fn test_bad_geometry_rejected() {
        let mut config = ControlConfig::default();
        config.vessel.tidal_volume_cm = 20;
        assert_eq!(config.validate(), Err(ConfigError::InvalidThresholds));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_from_toml_partial() {
        let config = ControlConfig::from_toml(
            "[vessel]\nheight_cm = 30\ntidal_volume_cm = 16\n\n[button]\nactive_high = false\n",
        )
        .unwrap();

        assert_eq!(config.vessel.height_cm, 30);
        assert_eq!(config.vessel.tidal_volume_cm, 16);
        assert_eq!(config.vessel.safety_margin_cm, 4);
        assert!(!config.button.active_high);
        assert_eq!(config.button.debounce_ms, 150);
        assert_eq!(config.ramp, RampConfig::default());
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_from_toml_rejects_unknown_and_invalid() {
        assert_eq!(
            ControlConfig::from_toml("[vessel]\ndepth_cm = 30\n"),
            Err(ConfigError::Parse)
        );
        assert_eq!(
            ControlConfig::from_toml("[ramp]\nstep_ticks = 0\n"),
            Err(ConfigError::ZeroRampStep)
        );
    }
}
