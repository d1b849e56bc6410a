//! Sensor health monitoring
//!
//! Detects ranging faults. Faults are reported, never fatal: the cycle
//! keeps running on the clamped readings.

pub mod monitor;

pub use monitor::{SensorHealth, SensorMonitor};
