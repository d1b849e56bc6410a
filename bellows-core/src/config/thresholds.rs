//! Level thresholds derived from vessel geometry

use super::{ConfigError, VesselConfig};

/// Water level marks (cm above the vessel floor)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Thresholds {
    /// Vessel height; a level can never exceed this
    pub vessel_height: u16,
    /// Filling stops at or above this level
    pub high_mark: u16,
    /// Emptying stops at or below this level
    pub low_mark: u16,
    /// Phase decision point
    pub center_mark: u16,
}

impl Thresholds {
    /// Derive the marks and check `low < center < high < height`
    pub fn from_config(vessel: &VesselConfig) -> Result<Self, ConfigError> {
        let height = vessel.height_cm;
        let high_mark = height
            .checked_sub(vessel.safety_margin_cm)
            .ok_or(ConfigError::InvalidThresholds)?;
        let low_mark = high_mark
            .checked_sub(vessel.tidal_volume_cm)
            .ok_or(ConfigError::InvalidThresholds)?;
        let center_mark = height / 2;

        if !(low_mark < center_mark && center_mark < high_mark && high_mark < height) {
            return Err(ConfigError::InvalidThresholds);
        }

        Ok(Self {
            vessel_height: height,
            high_mark,
            low_mark,
            center_mark,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vessel(height_cm: u16, tidal_volume_cm: u16, safety_margin_cm: u16) -> VesselConfig {
        VesselConfig {
            height_cm,
            tidal_volume_cm,
            safety_margin_cm,
        }
    }

    #[test]
    fn test_default_marks() {
        let t = Thresholds::from_config(&vessel(20, 12, 4)).unwrap();
        assert_eq!(t.high_mark, 16);
        assert_eq!(t.low_mark, 4);
        assert_eq!(t.center_mark, 10);
        assert_eq!(t.vessel_height, 20);
    }

    #[test]
    fn test_zero_margin_rejected() {
        // high mark would equal the vessel height
        assert_eq!(
            Thresholds::from_config(&vessel(20, 12, 0)),
            Err(ConfigError::InvalidThresholds)
        );
    }

    #[test]
    fn test_underflow_rejected() {
        assert_eq!(
            Thresholds::from_config(&vessel(20, 12, 30)),
            Err(ConfigError::InvalidThresholds)
        );
        assert_eq!(
            Thresholds::from_config(&vessel(20, 20, 4)),
            Err(ConfigError::InvalidThresholds)
        );
    }

    #[test]
    fn test_center_outside_band_rejected() {
        // low mark 12 sits above the center mark 10
        assert_eq!(
            Thresholds::from_config(&vessel(20, 4, 4)),
            Err(ConfigError::InvalidThresholds)
        );
    }
}
