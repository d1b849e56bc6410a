//! Dual-winding PWM pump driver
//!
//! Each pump has a forward and a reverse winding on separate PWM
//! channels. Drive levels arrive as 0-255 from the ramp and are scaled to
//! the channel's duty range.
//!
//! ```ignore
//! let mut pump = PwmPump::new(pwm_fwd, pwm_rev)?;
//!
//! // Once per control tick:
//! pump.apply(output.pumps[Vessel::A.index()])?;
//! ```

use embedded_hal::pwm::SetDutyCycle;

use bellows_core::traits::{PumpDrive, PumpOutput};

/// Full-scale drive level
const DRIVE_MAX: u16 = u8::MAX as u16;

/// Pump driven by two PWM channels
pub struct PwmPump<P> {
    forward: P,
    reverse: P,
    /// Last drive applied
    drive: PumpDrive,
}

impl<P: SetDutyCycle> PwmPump<P> {
    /// Create a pump driver with both windings off
    pub fn new(forward: P, reverse: P) -> Result<Self, P::Error> {
        let mut pump = Self {
            forward,
            reverse,
            drive: PumpDrive::off(),
        };
        pump.off()?;
        Ok(pump)
    }

    /// Last drive applied
    pub fn drive(&self) -> PumpDrive {
        self.drive
    }
}

impl<P: SetDutyCycle> PumpOutput for PwmPump<P> {
    type Error = P::Error;

    fn apply(&mut self, drive: PumpDrive) -> Result<(), P::Error> {
        self.forward
            .set_duty_cycle_fraction(drive.forward as u16, DRIVE_MAX)?;
        self.reverse
            .set_duty_cycle_fraction(drive.reverse as u16, DRIVE_MAX)?;
        self.drive = drive;
        Ok(())
    }
}
