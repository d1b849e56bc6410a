//! Range sensor traits

/// One of the two water vessels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Vessel {
    A,
    B,
}

impl Vessel {
    /// Both vessels, in sampling order
    pub const ALL: [Vessel; 2] = [Vessel::A, Vessel::B];

    /// Index into per-vessel arrays
    pub const fn index(self) -> usize {
        match self {
            Vessel::A => 0,
            Vessel::B => 1,
        }
    }
}

/// Errors that can occur while ranging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Echo line never went high, or stayed high past the timeout
    Timeout,
    /// Trigger or echo pin could not be accessed
    Pin,
}

/// Trait for ultrasonic range finders
///
/// Implementations trigger a ping and time the echo for the given
/// vessel. Vessels may share a trigger line, so calls are sequential.
pub trait RangeFinder {
    /// Measure the round-trip echo time in microseconds
    fn measure_echo_us(&mut self, vessel: Vessel) -> Result<u32, SensorError>;
}
