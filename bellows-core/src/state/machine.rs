//! Phase state machine definition
//!
//! Valve pattern and pump policy are a function of the current phase.

use super::events::Event;

/// System phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SystemPhase {
    /// Pumps off, cycle halted; initial phase
    #[default]
    Stopped,
    /// Both vessels filling, air pushed to the lungs
    Inhaling,
    /// Both vessels emptying, air drawn from the lungs
    Exhaling,
}

impl SystemPhase {
    /// Check if the cycle is running
    pub fn is_running(&self) -> bool {
        !matches!(self, SystemPhase::Stopped)
    }

    /// Process an event and return the next phase
    ///
    /// `Toggle` from `Stopped` enters `Inhaling` with both vessels idle;
    /// the controller settles the real phase in the same tick.
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use SystemPhase::*;

        match (self, event) {
            (Stopped, Toggle) => Inhaling,
            (Inhaling | Exhaling, Toggle) => Stopped,

            (Inhaling | Exhaling, BeginInhale) => Inhaling,
            (Inhaling | Exhaling, BeginExhale) => Exhaling,

            // Cycle events never start a stopped machine
            (Stopped, BeginInhale | BeginExhale) => Stopped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_phase() {
        assert_eq!(SystemPhase::default(), SystemPhase::Stopped);
        assert!(!SystemPhase::Stopped.is_running());
    }

    #[test]
    fn test_toggle_round_trip() {
        let running = SystemPhase::Stopped.transition(Event::Toggle);
        assert!(running.is_running());
        assert_eq!(running.transition(Event::Toggle), SystemPhase::Stopped);
        assert_eq!(
            SystemPhase::Exhaling.transition(Event::Toggle),
            SystemPhase::Stopped
        );
    }

    #[test]
    fn test_cycle_flips() {
        assert_eq!(
            SystemPhase::Inhaling.transition(Event::BeginExhale),
            SystemPhase::Exhaling
        );
        assert_eq!(
            SystemPhase::Exhaling.transition(Event::BeginInhale),
            SystemPhase::Inhaling
        );
        assert_eq!(
            SystemPhase::Inhaling.transition(Event::BeginInhale),
            SystemPhase::Inhaling
        );
    }

    #[test]
    fn test_cycle_events_ignored_when_stopped() {
        for event in [Event::BeginInhale, Event::BeginExhale] {
            assert_eq!(SystemPhase::Stopped.transition(event), SystemPhase::Stopped);
        }
    }
}
