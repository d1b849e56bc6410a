//! Ultrasonic range to water level conversion
//!
//! The sensor sits at the top of the vessel looking down, so the water
//! level is the vessel height minus the measured distance.

use crate::config::Thresholds;
use crate::traits::SensorError;

/// Microseconds for sound to travel one centimeter
const US_PER_CM: u32 = 29;

/// Convert a round-trip echo time to a one-way distance
///
/// Integer arithmetic throughout; sub-centimeter remainders are dropped.
pub const fn echo_to_distance_cm(echo_us: u32) -> u32 {
    echo_us / US_PER_CM / 2
}

/// Water level estimator for one vessel geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSensor {
    vessel_height: u16,
}

impl RangeSensor {
    /// Create an estimator for vessels of the given height
    pub const fn new(vessel_height_cm: u16) -> Self {
        Self {
            vessel_height: vessel_height_cm,
        }
    }

    /// Create an estimator matching the configured thresholds
    pub const fn from_thresholds(thresholds: &Thresholds) -> Self {
        Self::new(thresholds.vessel_height)
    }

    /// Water level for a measured distance
    ///
    /// Distances beyond the vessel floor clamp to zero rather than going
    /// negative.
    pub fn level_cm(&self, distance_cm: u32) -> u16 {
        (self.vessel_height as u32).saturating_sub(distance_cm) as u16
    }

    /// Water level for an echo reading
    ///
    /// A failed reading is treated as out of range and reads as an empty
    /// vessel. This is silent; callers track failures separately.
    pub fn level_from_echo(&self, reading: Result<u32, SensorError>) -> u16 {
        match reading {
            Ok(echo_us) => self.level_cm(echo_to_distance_cm(echo_us)),
            Err(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_to_distance() {
        assert_eq!(echo_to_distance_cm(0), 0);
        assert_eq!(echo_to_distance_cm(57), 0);
        assert_eq!(echo_to_distance_cm(58), 1);
        // 10 cm = 580us round trip
        assert_eq!(echo_to_distance_cm(580), 10);
        assert_eq!(echo_to_distance_cm(637), 10);
    }

    #[test]
    fn test_level_from_distance() {
        let sensor = RangeSensor::new(20);
        assert_eq!(sensor.level_cm(0), 20);
        assert_eq!(sensor.level_cm(4), 16);
        assert_eq!(sensor.level_cm(20), 0);
    }

    #[test]
    fn test_level_clamps_to_zero() {
        let sensor = RangeSensor::new(20);
        assert_eq!(sensor.level_cm(21), 0);
        assert_eq!(sensor.level_cm(u32::MAX), 0);
        assert_eq!(sensor.level_from_echo(Ok(u32::MAX)), 0);
    }

    #[test]
    fn test_timeout_reads_empty() {
        let sensor = RangeSensor::new(20);
        assert_eq!(sensor.level_from_echo(Err(SensorError::Timeout)), 0);
        assert_eq!(sensor.level_from_echo(Ok(580)), 10);
    }
}
