//! Solenoid valve traits

/// Solenoid valve position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValveState {
    /// De-energized, no flow
    #[default]
    Closed,
    /// Energized, air flows
    Open,
}

impl ValveState {
    /// Check if the valve is open
    pub fn is_open(self) -> bool {
        self == ValveState::Open
    }
}

/// Trait for valve output control
pub trait ValveOutput {
    /// Error raised by the underlying pin
    type Error;

    /// Open or close the valve
    fn set_open(&mut self, open: bool) -> Result<(), Self::Error>;

    /// Check if the valve is currently open
    fn is_open(&self) -> bool;

    /// Drive the valve to a state
    fn set_state(&mut self, state: ValveState) -> Result<(), Self::Error> {
        self.set_open(state.is_open())
    }
}
