//! Start/stop button debouncer
//!
//! Two-stage filter: a raw reading must hold unchanged for longer than
//! the debounce delay before it is accepted, and only an accepted change
//! to the pressed level produces an event. Chatter shorter than the
//! window is absorbed, and a held button never fires twice.

use crate::config::ButtonConfig;

/// A debounced press (transition to the active level)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Press {
    /// Time the press was accepted (ms)
    pub at_ms: u32,
}

/// Debouncer state for one button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonDebouncer {
    /// Previous raw reading
    last_raw: bool,
    /// Accepted reading
    debounced: bool,
    /// Time of the last raw change (ms)
    last_change_ms: u32,
}

impl ButtonDebouncer {
    /// Create a debouncer resting at the released level
    pub const fn new(config: &ButtonConfig) -> Self {
        let released = !config.active_high;
        Self {
            last_raw: released,
            debounced: released,
            last_change_ms: 0,
        }
    }

    /// Check if the button is currently held, after debouncing
    pub fn is_pressed(&self, config: &ButtonConfig) -> bool {
        self.debounced == config.active_high
    }

    /// Feed one raw sample
    ///
    /// Returns a press when a change to the active level is accepted.
    /// `now_ms` may wrap.
    pub fn observe(&mut self, raw: bool, now_ms: u32, config: &ButtonConfig) -> Option<Press> {
        if raw != self.last_raw {
            self.last_change_ms = now_ms;
        }
        self.last_raw = raw;

        if now_ms.wrapping_sub(self.last_change_ms) <= config.debounce_ms {
            return None;
        }
        if raw == self.debounced {
            return None;
        }

        self.debounced = raw;
        (raw == config.active_high).then_some(Press { at_ms: now_ms })
    }
}
