//! Motor driver implementations
//!
//! - Pumps: dual-winding reversible motors, one PWM channel per winding

pub mod pump;

pub use pump::PwmPump;
