//! Status indicator trait

/// Trait for a single on/off indicator (the running LED)
pub trait IndicatorOutput {
    /// Error raised by the underlying pin
    type Error;

    /// Light or clear the indicator
    fn set_lit(&mut self, lit: bool) -> Result<(), Self::Error>;
}
