//! Sensor monitor implementation
//!
//! Counts consecutive failed echo readings per vessel.

use crate::traits::{SensorError, Vessel};

/// Sensor condition status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorHealth {
    /// All readings arriving
    Ok,
    /// Vessel has missed too many echoes in a row
    Degraded(Vessel),
}

/// Monitor for echo failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorMonitor {
    /// Consecutive failed readings, per vessel
    misses: [u8; 2],
    /// Last error seen, per vessel
    last_error: [Option<SensorError>; 2],
}

impl SensorMonitor {
    /// Create a new sensor monitor
    pub const fn new() -> Self {
        Self {
            misses: [0; 2],
            last_error: [None; 2],
        }
    }

    /// Record the outcome of one reading
    pub fn record(&mut self, vessel: Vessel, reading: &Result<u32, SensorError>) {
        let i = vessel.index();
        match reading {
            Ok(_) => {
                self.misses[i] = 0;
                self.last_error[i] = None;
            }
            Err(e) => {
                self.misses[i] = self.misses[i].saturating_add(1);
                self.last_error[i] = Some(*e);
            }
        }
    }

    /// Consecutive failed readings for a vessel
    pub fn consecutive_misses(&self, vessel: Vessel) -> u8 {
        self.misses[vessel.index()]
    }

    /// Most recent error for a vessel, cleared by a good reading
    pub fn last_error(&self, vessel: Vessel) -> Option<SensorError> {
        self.last_error[vessel.index()]
    }

    /// Check sensor health
    ///
    /// Returns the first vessel with at least `warn_after` consecutive
    /// misses. A limit of 0 disables reporting.
    pub fn check(&self, warn_after: u8) -> SensorHealth {
        if warn_after == 0 {
            return SensorHealth::Ok;
        }

        Vessel::ALL
            .into_iter()
            .find(|v| self.misses[v.index()] >= warn_after)
            .map_or(SensorHealth::Ok, SensorHealth::Degraded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_operation() {
        let mut monitor = SensorMonitor::new();
        monitor.record(Vessel::A, &Ok(580));
        monitor.record(Vessel::B, &Ok(580));
        assert_eq!(monitor.check(3), SensorHealth::Ok);
    }

    #[test]
    fn test_repeated_timeouts_degrade() {
        let mut monitor = SensorMonitor::new();

        for _ in 0..2 {
            monitor.record(Vessel::B, &Err(SensorError::Timeout));
        }
        assert_eq!(monitor.check(3), SensorHealth::Ok);

        monitor.record(Vessel::B, &Err(SensorError::Timeout));
        assert_eq!(monitor.check(3), SensorHealth::Degraded(Vessel::B));
        assert_eq!(monitor.last_error(Vessel::B), Some(SensorError::Timeout));
        assert_eq!(monitor.consecutive_misses(Vessel::A), 0);
    }

    #[test]
    fn test_good_reading_resets() {
        let mut monitor = SensorMonitor::new();

        for _ in 0..5 {
            monitor.record(Vessel::A, &Err(SensorError::Timeout));
        }
        assert_eq!(monitor.check(3), SensorHealth::Degraded(Vessel::A));

        monitor.record(Vessel::A, &Ok(300));
        assert_eq!(monitor.consecutive_misses(Vessel::A), 0);
        assert_eq!(monitor.last_error(Vessel::A), None);
        assert_eq!(monitor.check(3), SensorHealth::Ok);
    }

    #[test]
    fn test_zero_limit_disables() {
        let mut monitor = SensorMonitor::new();
        monitor.record(Vessel::A, &Err(SensorError::Pin));
        assert_eq!(monitor.check(0), SensorHealth::Ok);
    }
}
