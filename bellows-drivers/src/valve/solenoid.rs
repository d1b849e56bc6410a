//! GPIO solenoid valve
//!
//! Drives a solenoid through a GPIO pin (directly or via a MOSFET/relay
//! board). Energized = open.

use embedded_hal::digital::OutputPin;

use bellows_core::traits::ValveOutput;

/// GPIO solenoid valve
///
/// The pin can be configured as active-high (default) or active-low.
pub struct Solenoid<P> {
    pin: P,
    /// If true, valve OPEN = pin LOW
    inverted: bool,
    /// Current logical state (true = open)
    open: bool,
}

impl<P: OutputPin> Solenoid<P> {
    /// Create a new solenoid output, starting closed
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin to control
    /// - `inverted`: If true, valve opens when pin is LOW (active-low boards)
    pub fn new(pin: P, inverted: bool) -> Result<Self, P::Error> {
        let mut valve = Self {
            pin,
            inverted,
            open: false,
        };
        valve.set_open(false)?;
        Ok(valve)
    }

    /// Create a new solenoid with active-high output
    pub fn new_active_high(pin: P) -> Result<Self, P::Error> {
        Self::new(pin, false)
    }

    /// Create a new solenoid with active-low output
    pub fn new_active_low(pin: P) -> Result<Self, P::Error> {
        Self::new(pin, true)
    }
}

impl<P: OutputPin> ValveOutput for Solenoid<P> {
    type Error = P::Error;

    fn set_open(&mut self, open: bool) -> Result<(), P::Error> {
        // Pin level is high when open XOR inverted
        self.pin.set_state((open != self.inverted).into())?;
        self.open = open;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }
}
