//! Actuator patterns
//!
//! Maps controller phases to valve positions.

pub mod valve;

pub use valve::{valve_pattern, ValvePattern};
