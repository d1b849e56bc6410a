//! Configuration loading
//!
//! `ventilator.toml` is compiled into the firmware. build.rs holds it to
//! the same line grammar, keys and field ranges as the runtime reader, so
//! a file that builds also parses.

use defmt::*;

use bellows_core::config::{parse_config, ControlConfig, Thresholds};

/// Embedded configuration (compiled into firmware)
/// Edit ventilator.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../ventilator.toml");

/// Parse the embedded configuration, falling back to defaults
pub fn load_config() -> ControlConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            warn!("Using built-in default configuration");
            ControlConfig::default()
        }
    }
}

/// Log the values the control loop will run with
pub fn log_summary(config: &ControlConfig) {
    info!(
        "Vessel: height={}cm tidal={}cm margin={}cm",
        config.vessel.height_cm, config.vessel.tidal_volume_cm, config.vessel.safety_margin_cm
    );

    if let Ok(marks) = Thresholds::from_config(&config.vessel) {
        info!(
            "Marks: low={}cm center={}cm high={}cm",
            marks.low_mark, marks.center_mark, marks.high_mark
        );
    }

    info!(
        "Ramp: {} steps, every {} tick(s), peak drive {}",
        config.ramp.curve.len(),
        config.ramp.step_ticks,
        config.ramp.curve[config.ramp.curve.len() - 1]
    );
    info!(
        "Button: debounce={}ms active_high={}",
        config.button.debounce_ms, config.button.active_high
    );
    info!(
        "Timing: tick={}ms echo_timeout={}us",
        config.timing.tick_interval_ms, config.timing.echo_timeout_us
    );
    info!(
        "Safety: close_valves_on_stop={} timeout_warn_after={}",
        config.safety.close_valves_on_stop, config.safety.timeout_warn_after
    );
}
