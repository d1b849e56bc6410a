//! Board wiring
//!
//! Pin assignments for the reference RP2040 rig:
//!
//! | Function              | Pin           |
//! |-----------------------|---------------|
//! | Pump A fwd / rev      | GPIO2 / GPIO3 (PWM slice 1) |
//! | Pump B fwd / rev      | GPIO4 / GPIO5 (PWM slice 2) |
//! | Ultrasonic trigger    | GPIO6 (shared) |
//! | Echo A / Echo B       | GPIO7 / GPIO8 |
//! | Solenoid A / B        | GPIO9 / GPIO10 |
//! | High-water float A / B| GPIO11 / GPIO12 (to ground, pull-up) |
//! | Start/stop button     | GPIO14        |
//! | Status LED            | GPIO25 (on-board) |

use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::pwm::{Config as PwmConfig, Pwm, PwmOutput};
use embassy_rp::Peripherals;
use embassy_time::{Delay, Instant};

use bellows_core::config::ControlConfig;
use bellows_core::traits::Vessel;
use bellows_drivers::indicator::StatusLed;
use bellows_drivers::motor::PwmPump;
use bellows_drivers::sensor::{MicrosClock, UltrasonicPair};
use bellows_drivers::valve::Solenoid;

/// PWM clock divider: 125 MHz / 16 / 10_000 gives about 780 Hz
const PWM_DIVIDER: u8 = 16;
/// PWM counter wrap value
const PWM_TOP: u16 = 9_999;

/// Microsecond clock backed by the embassy time driver
pub struct EmbassyClock;

impl MicrosClock for EmbassyClock {
    fn now_us(&self) -> u32 {
        // Truncation is fine, only differences are used
        Instant::now().as_micros() as u32
    }
}

pub type Rangefinders =
    UltrasonicPair<Output<'static>, Input<'static>, Input<'static>, Delay, EmbassyClock>;
pub type Pump = PwmPump<PwmOutput<'static>>;
pub type Valve = Solenoid<Output<'static>>;
pub type Led = StatusLed<Output<'static>>;

/// Board bring-up errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum BoardError {
    /// PWM slice did not yield both channels
    PwmChannels,
    /// PWM output rejected the initial duty cycle
    Pwm,
    /// GPIO output could not be driven to its initial level
    Gpio,
}

/// Every peripheral the control task drives
pub struct Board {
    pub rangefinders: Rangefinders,
    pub pumps: [Pump; 2],
    pub valves: [Valve; 2],
    pub led: Led,
    pub button: Input<'static>,
    pub float_switches: [Input<'static>; 2],
}

impl Board {
    /// Claim and initialize all pins
    ///
    /// Pumps start off, valves closed and the LED dark.
    pub fn new(p: Peripherals, config: &ControlConfig) -> Result<Self, BoardError> {
        let mut pwm_config = PwmConfig::default();
        pwm_config.divider = PWM_DIVIDER.into();
        pwm_config.top = PWM_TOP;

        let pump_a = Pwm::new_output_ab(p.PWM_SLICE1, p.PIN_2, p.PIN_3, pwm_config.clone());
        let pump_b = Pwm::new_output_ab(p.PWM_SLICE2, p.PIN_4, p.PIN_5, pwm_config);

        let rangefinders = UltrasonicPair::new(
            Output::new(p.PIN_6, Level::Low),
            Input::new(p.PIN_7, Pull::Down),
            Input::new(p.PIN_8, Pull::Down),
            Delay,
            EmbassyClock,
            config.timing.echo_timeout_us,
        );

        let valves = [
            Solenoid::new_active_high(Output::new(p.PIN_9, Level::Low))
                .map_err(|_| BoardError::Gpio)?,
            Solenoid::new_active_high(Output::new(p.PIN_10, Level::Low))
                .map_err(|_| BoardError::Gpio)?,
        ];

        // Active-high buttons are wired to 3V3, active-low ones to ground
        let button_pull = if config.button.active_high {
            Pull::Down
        } else {
            Pull::Up
        };

        Ok(Self {
            rangefinders,
            pumps: [pump_from(pump_a)?, pump_from(pump_b)?],
            valves,
            led: StatusLed::new(Output::new(p.PIN_25, Level::Low)).map_err(|_| BoardError::Gpio)?,
            button: Input::new(p.PIN_14, button_pull),
            float_switches: [Input::new(p.PIN_11, Pull::Up), Input::new(p.PIN_12, Pull::Up)],
        })
    }

    /// Whether the high-water float switch of `vessel` has tripped
    pub fn high_water(&self, vessel: Vessel) -> bool {
        self.float_switches[vessel.index()].is_low()
    }
}

fn pump_from(pwm: Pwm<'static>) -> Result<Pump, BoardError> {
    match pwm.split() {
        (Some(forward), Some(reverse)) => {
            PwmPump::new(forward, reverse).map_err(|_| BoardError::Pwm)
        }
        _ => Err(BoardError::PwmChannels),
    }
}
