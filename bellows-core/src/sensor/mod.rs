//! Sensor conversions
//!
//! Turns raw echo timings into water levels.

pub mod range;

pub use range::{echo_to_distance_cm, RangeSensor};
