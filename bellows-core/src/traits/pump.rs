//! Pump traits
//!
//! Each pump is a reversible motor with two windings (forward and
//! reverse), each driven by its own PWM output.

/// Commanded travel of a vessel and of the pump that serves it
///
/// The same tri-state is used for the vessel's water level and for the
/// pump ramp, so `Idle` always means "stopped" and never "unknown".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Water level rising, pump ramping up the curve
    Filling,
    /// Pump off
    #[default]
    Idle,
    /// Water level falling, pump ramping down the curve
    Emptying,
}

impl Direction {
    /// Check if the vessel has settled
    pub fn is_idle(self) -> bool {
        self == Direction::Idle
    }
}

/// Drive levels for the two windings of one pump (0-255)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PumpDrive {
    /// Forward winding drive level
    pub forward: u8,
    /// Reverse winding drive level
    pub reverse: u8,
}

impl PumpDrive {
    /// Both windings off
    pub const fn off() -> Self {
        Self {
            forward: 0,
            reverse: 0,
        }
    }

    /// Check if both windings are off
    pub fn is_off(&self) -> bool {
        self.forward == 0 && self.reverse == 0
    }
}

/// Trait for pump outputs
///
/// Implementations write the two drive levels to whatever PWM hardware
/// backs the pump.
pub trait PumpOutput {
    /// Error raised by the underlying PWM channels
    type Error;

    /// Apply drive levels to both windings
    fn apply(&mut self, drive: PumpDrive) -> Result<(), Self::Error>;

    /// Force both windings off
    fn off(&mut self) -> Result<(), Self::Error> {
        self.apply(PumpDrive::off())
    }
}
