//! Hardware abstraction traits
//!
//! These traits define the interface between the cycle logic
//! and hardware-specific implementations.

pub mod indicator;
pub mod pump;
pub mod sensor;
pub mod valve;

pub use indicator::IndicatorOutput;
pub use pump::{Direction, PumpDrive, PumpOutput};
pub use sensor::{RangeFinder, SensorError, Vessel};
pub use valve::{ValveOutput, ValveState};
