//! Events that trigger phase transitions

/// Events that can trigger phase transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Operator events
    /// Debounced start/stop press
    Toggle,

    // Cycle events
    /// Both vessels settled with vessel A at or below the center mark
    BeginInhale,
    /// Both vessels settled with vessel A above the center mark
    BeginExhale,
}

impl Event {
    /// Check if this event comes from the operator
    pub fn is_user_event(&self) -> bool {
        matches!(self, Event::Toggle)
    }

    /// Check if this event comes from the cycle policy
    pub fn is_cycle_event(&self) -> bool {
        matches!(self, Event::BeginInhale | Event::BeginExhale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_sources() {
        assert!(Event::Toggle.is_user_event());
        assert!(!Event::Toggle.is_cycle_event());
        assert!(Event::BeginInhale.is_cycle_event());
        assert!(Event::BeginExhale.is_cycle_event());
        assert!(!Event::BeginExhale.is_user_event());
    }
}
