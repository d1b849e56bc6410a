//! Cycle controller
//!
//! Once per tick the controller reads both vessel levels and the button,
//! applies the threshold policy, and returns the drive for every output.
//! All mutable state lives in a caller-owned [`ControllerState`]; the
//! controller itself only holds immutable configuration.
//!
//! # Policy
//!
//! While running:
//! - a filling vessel stops (goes idle) at or above the high mark, or when
//!   its high-water float switch trips;
//! - an emptying vessel stops at or below the low mark;
//! - once both vessels are idle, vessel A decides the next phase: above the
//!   center mark both vessels empty (exhale), otherwise both fill (inhale).
//!
//! Starting from `Stopped` always lands on the last rule in the same tick,
//! since stopping leaves both vessels idle.

use crate::actuator::{valve_pattern, ValvePattern};
use crate::config::{ConfigError, ControlConfig, Thresholds};
use crate::input::{ButtonDebouncer, Press};
use crate::motion::PumpRamp;
use crate::safety::{SensorHealth, SensorMonitor};
use crate::sensor::RangeSensor;
use crate::state::{Event, SystemPhase};
use crate::traits::{Direction, PumpDrive, SensorError, Vessel};

/// Raw inputs sampled for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickInput {
    /// Monotonic time in ms (may wrap)
    pub now_ms: u32,
    /// Raw start/stop button level
    pub button: bool,
    /// Echo time per vessel, indexed by [`Vessel::index`]
    pub echoes: [Result<u32, SensorError>; 2],
    /// High-water float switch per vessel (true = tripped)
    pub high_water: [bool; 2],
}

/// Snapshot of the controller after a tick, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusReport {
    pub phase: SystemPhase,
    pub directions: [Direction; 2],
    /// Water levels in cm
    pub levels: [u16; 2],
    pub health: SensorHealth,
    /// Press accepted during this tick
    pub press: Option<Press>,
}

/// Outputs to apply after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutput {
    /// Pump drive per vessel, indexed by [`Vessel::index`]
    pub pumps: [PumpDrive; 2],
    pub valves: ValvePattern,
    /// Running indicator
    pub led: bool,
    pub report: StatusReport,
}

/// All mutable controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerState {
    phase: SystemPhase,
    directions: [Direction; 2],
    ramps: [PumpRamp; 2],
    valves: ValvePattern,
    button: ButtonDebouncer,
    sensors: SensorMonitor,
    led: bool,
}

impl ControllerState {
    /// Safe startup state: stopped, pumps at rest, valves closed, LED off
    pub fn new(config: &ControlConfig) -> Self {
        Self {
            phase: SystemPhase::Stopped,
            directions: [Direction::Idle; 2],
            ramps: [PumpRamp::new(); 2],
            valves: ValvePattern::closed(),
            button: ButtonDebouncer::new(&config.button),
            sensors: SensorMonitor::new(),
            led: false,
        }
    }

    /// Current phase
    pub fn phase(&self) -> SystemPhase {
        self.phase
    }

    /// Commanded direction for a vessel
    pub fn direction(&self, vessel: Vessel) -> Direction {
        self.directions[vessel.index()]
    }

    /// Ramp state for a vessel's pump
    pub fn ramp(&self, vessel: Vessel) -> &PumpRamp {
        &self.ramps[vessel.index()]
    }

    /// Last valve pattern applied
    pub fn valves(&self) -> ValvePattern {
        self.valves
    }

    /// Sensor failure counters
    pub fn sensors(&self) -> &SensorMonitor {
        &self.sensors
    }

    /// Running indicator state
    pub fn led(&self) -> bool {
        self.led
    }

    fn all_idle(&self) -> bool {
        self.directions.iter().all(|d| d.is_idle())
    }
}

/// Threshold policy and configuration for the inhale/exhale cycle
#[derive(Debug, Clone)]
pub struct CycleController {
    config: ControlConfig,
    thresholds: Thresholds,
    range: RangeSensor,
}

impl CycleController {
    /// Create a controller, validating the configuration
    pub fn new(config: ControlConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let thresholds = Thresholds::from_config(&config.vessel)?;

        Ok(Self {
            config,
            thresholds,
            range: RangeSensor::from_thresholds(&thresholds),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    /// Get the derived level marks
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Fresh state matching this controller's configuration
    pub fn initial_state(&self) -> ControllerState {
        ControllerState::new(&self.config)
    }

    /// Run one control tick
    pub fn tick(&self, state: &mut ControllerState, input: &TickInput) -> TickOutput {
        // Sense
        let mut levels = [0u16; 2];
        for vessel in Vessel::ALL {
            let reading = &input.echoes[vessel.index()];
            state.sensors.record(vessel, reading);
            levels[vessel.index()] = self.range.level_from_echo(*reading);
        }

        // Operator
        let press = state
            .button
            .observe(input.button, input.now_ms, &self.config.button);
        if press.is_some() {
            self.toggle(state);
        }

        // Decide
        if state.phase.is_running() {
            for vessel in Vessel::ALL {
                let i = vessel.index();
                state.directions[i] =
                    self.settle(state.directions[i], levels[i], input.high_water[i]);
            }

            if state.all_idle() {
                self.begin_half_cycle(state, levels[Vessel::A.index()]);
            }
        } else {
            state.directions = [Direction::Idle; 2];
        }

        // Actuate
        let ramp = &self.config.ramp;
        let pumps = [
            state.ramps[0].step(state.directions[0], ramp),
            state.ramps[1].step(state.directions[1], ramp),
        ];

        TickOutput {
            pumps,
            valves: state.valves,
            led: state.led,
            report: StatusReport {
                phase: state.phase,
                directions: state.directions,
                levels,
                health: state.sensors.check(self.config.safety.timeout_warn_after),
                press,
            },
        }
    }

    /// Start or stop the cycle
    fn toggle(&self, state: &mut ControllerState) {
        state.phase = state.phase.transition(Event::Toggle);
        state.led = state.phase.is_running();

        if !state.phase.is_running() {
            state.directions = [Direction::Idle; 2];
            if self.config.safety.close_valves_on_stop {
                state.valves = ValvePattern::closed();
            }
        }
    }

    /// Stop a vessel that has reached its mark
    fn settle(&self, direction: Direction, level: u16, high_water: bool) -> Direction {
        match direction {
            Direction::Filling if level >= self.thresholds.high_mark || high_water => {
                Direction::Idle
            }
            Direction::Emptying if level <= self.thresholds.low_mark => Direction::Idle,
            other => other,
        }
    }

    /// Pick the next half-cycle from vessel A's level
    fn begin_half_cycle(&self, state: &mut ControllerState, level_a: u16) {
        let (event, direction) = if level_a > self.thresholds.center_mark {
            (Event::BeginExhale, Direction::Emptying)
        } else {
            (Event::BeginInhale, Direction::Filling)
        };

        state.phase = state.phase.transition(event);
        state.directions = [direction; 2];
        if let Some(pattern) = valve_pattern(state.phase) {
            state.valves = pattern;
        }
    }
}
