//! Pump drive ramp
//!
//! Each pump winding holds an index into the ramp curve. The index moves
//! at most one entry per ramp step, so going from rest to full drive
//! takes the length of the curve in steps.
//!
//! # Semantics
//!
//! - `Filling`: forward and reverse indices both step up.
//! - `Emptying`: forward and reverse indices both step down.
//! - `Idle`: both outputs are forced to zero at once. The indices are
//!   left where they are, so the next non-idle command resumes from them.
//!
//! Both windings follow the same index. The pump driver boards expect
//! that; do not invert the reverse winding without checking the wiring.

use crate::config::{RampConfig, RAMP_CURVE_LEN};
use crate::traits::{Direction, PumpDrive};

/// Highest valid ramp index
const MAX_INDEX: u8 = (RAMP_CURVE_LEN - 1) as u8;

/// Ramp position for a single motor winding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RampChannel {
    index: u8,
}

impl RampChannel {
    /// Current index into the ramp curve
    pub fn index(&self) -> u8 {
        self.index
    }

    /// Move one entry toward the given direction, saturating at the ends
    fn advance(&mut self, direction: Direction) {
        self.index = match direction {
            Direction::Filling => self.index.saturating_add(1).min(MAX_INDEX),
            Direction::Emptying => self.index.saturating_sub(1),
            Direction::Idle => self.index,
        };
    }

    /// Drive level at the current index
    fn level(&self, curve: &[u8; RAMP_CURVE_LEN]) -> u8 {
        curve[self.index as usize]
    }
}

/// Ramp state for one pump (forward and reverse windings)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PumpRamp {
    forward: RampChannel,
    reverse: RampChannel,
    /// Non-idle calls since the last index step
    pending_ticks: u8,
}

impl PumpRamp {
    /// Create a ramp at rest (both indices 0)
    pub const fn new() -> Self {
        Self {
            forward: RampChannel { index: 0 },
            reverse: RampChannel { index: 0 },
            pending_ticks: 0,
        }
    }

    /// Forward winding channel
    pub fn forward(&self) -> RampChannel {
        self.forward
    }

    /// Reverse winding channel
    pub fn reverse(&self) -> RampChannel {
        self.reverse
    }

    /// Step the ramp toward `direction` and return the drive to apply
    pub fn step(&mut self, direction: Direction, config: &RampConfig) -> PumpDrive {
        if direction.is_idle() {
            self.pending_ticks = 0;
            return PumpDrive::off();
        }

        self.pending_ticks = self.pending_ticks.saturating_add(1);
        if self.pending_ticks >= config.step_ticks {
            self.pending_ticks = 0;
            self.forward.advance(direction);
            self.reverse.advance(direction);
        }

        PumpDrive {
            forward: self.forward.level(&config.curve),
            reverse: self.reverse.level(&config.curve),
        }
    }
}
