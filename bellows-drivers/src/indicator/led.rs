//! GPIO status LED

use embedded_hal::digital::OutputPin;

use bellows_core::traits::IndicatorOutput;

/// Active-high LED on a GPIO pin
pub struct StatusLed<P> {
    pin: P,
    lit: bool,
}

impl<P: OutputPin> StatusLed<P> {
    /// Create an LED, starting dark
    pub fn new(mut pin: P) -> Result<Self, P::Error> {
        pin.set_low()?;
        Ok(Self { pin, lit: false })
    }

    /// Check if the LED is lit
    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

impl<P: OutputPin> IndicatorOutput for StatusLed<P> {
    type Error = P::Error;

    fn set_lit(&mut self, lit: bool) -> Result<(), P::Error> {
        if lit == self.lit {
            return Ok(());
        }
        self.pin.set_state(lit.into())?;
        self.lit = lit;
        Ok(())
    }
}
