//! Pump motion
//!
//! Ramp math that turns a commanded direction into bounded per-tick
//! changes of pump drive level.

pub mod ramp;

pub use ramp::{PumpRamp, RampChannel};
