//! Cycle control
//!
//! Ties the sensors, debouncer, phase machine, and pump ramps together
//! into a single synchronous tick.

pub mod cycle;

pub use cycle::{ControllerState, CycleController, StatusReport, TickInput, TickOutput};
