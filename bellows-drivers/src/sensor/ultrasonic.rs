//! Ultrasonic range finder pair
//!
//! Two HC-SR04 style sensors share one trigger line and have separate
//! echo lines. Each measurement pings the shared trigger and times the
//! echo of the requested vessel only, so the two vessels are sampled one
//! after the other.
//!
//! # Timing
//!
//! ```text
//! trigger: __|‾‾10us‾‾|______________________________
//! echo:    ___________|‾‾‾‾‾‾ round trip ‾‾‾‾‾‾|_____
//! ```
//!
//! Every wait is bounded by the echo timeout, measured from the start of
//! the measurement. Busy-waits; the control loop is single-threaded.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use bellows_core::traits::{RangeFinder, SensorError, Vessel};

/// Microsecond time source for echo timing
///
/// May wrap; only differences are used.
pub trait MicrosClock {
    /// Current time in microseconds
    fn now_us(&self) -> u32;
}

/// Two ultrasonic sensors on a shared trigger line
pub struct UltrasonicPair<T, EA, EB, D, C> {
    trigger: T,
    echo_a: EA,
    echo_b: EB,
    delay: D,
    clock: C,
    /// Longest wait for an echo (us)
    timeout_us: u32,
}

impl<T, EA, EB, D, C> UltrasonicPair<T, EA, EB, D, C>
where
    T: OutputPin,
    EA: InputPin,
    EB: InputPin,
    D: DelayNs,
    C: MicrosClock,
{
    /// Create a sensor pair
    ///
    /// # Arguments
    /// - `trigger`: shared trigger output
    /// - `echo_a`, `echo_b`: echo inputs for vessel A and B
    /// - `timeout_us`: echo timeout, typically 10_000 (about 1.7m range)
    pub fn new(trigger: T, echo_a: EA, echo_b: EB, delay: D, clock: C, timeout_us: u32) -> Self {
        Self {
            trigger,
            echo_a,
            echo_b,
            delay,
            clock,
            timeout_us,
        }
    }

    /// Get the echo timeout
    pub fn timeout_us(&self) -> u32 {
        self.timeout_us
    }

    /// Send a 10us trigger pulse
    fn ping(&mut self) -> Result<(), SensorError> {
        self.trigger.set_low().map_err(|_| SensorError::Pin)?;
        self.delay.delay_us(2);
        self.trigger.set_high().map_err(|_| SensorError::Pin)?;
        self.delay.delay_us(10);
        self.trigger.set_low().map_err(|_| SensorError::Pin)
    }
}

impl<T, EA, EB, D, C> RangeFinder for UltrasonicPair<T, EA, EB, D, C>
where
    T: OutputPin,
    EA: InputPin,
    EB: InputPin,
    D: DelayNs,
    C: MicrosClock,
{
    fn measure_echo_us(&mut self, vessel: Vessel) -> Result<u32, SensorError> {
        self.ping()?;
        match vessel {
            Vessel::A => pulse_high_us(&mut self.echo_a, &self.clock, self.timeout_us),
            Vessel::B => pulse_high_us(&mut self.echo_b, &self.clock, self.timeout_us),
        }
    }
}

/// Time the next high pulse on `echo`
///
/// Waits out any pulse already in progress, then for the rising edge,
/// then for the falling edge. Fails if the whole sequence exceeds
/// `timeout_us`.
pub fn pulse_high_us<E: InputPin, C: MicrosClock>(
    echo: &mut E,
    clock: &C,
    timeout_us: u32,
) -> Result<u32, SensorError> {
    let start = clock.now_us();

    wait_for_level(echo, false, clock, start, timeout_us)?;
    wait_for_level(echo, true, clock, start, timeout_us)?;
    let rise = clock.now_us();
    wait_for_level(echo, false, clock, start, timeout_us)?;
    let fall = clock.now_us();

    Ok(fall.wrapping_sub(rise))
}

fn wait_for_level<E: InputPin, C: MicrosClock>(
    echo: &mut E,
    high: bool,
    clock: &C,
    start: u32,
    timeout_us: u32,
) -> Result<(), SensorError> {
    loop {
        if echo.is_high().map_err(|_| SensorError::Pin)? == high {
            return Ok(());
        }
        if clock.now_us().wrapping_sub(start) > timeout_us {
            return Err(SensorError::Timeout);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    /// Clock that advances 1us on every read
    struct MockClock<'a> {
        now: &'a Cell<u32>,
    }

    impl MicrosClock for MockClock<'_> {
        fn now_us(&self) -> u32 {
            let t = self.now.get();
            self.now.set(t.wrapping_add(1));
            t
        }
    }

    /// Echo pin that is high during [rise, fall) of mock time
    struct MockEcho<'a> {
        now: &'a Cell<u32>,
        window: Option<(u32, u32)>,
    }

    impl ErrorType for MockEcho<'_> {
        type Error = Infallible;
    }

    impl InputPin for MockEcho<'_> {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            let t = self.now.get();
            Ok(self.window.is_some_and(|(rise, fall)| t >= rise && t < fall))
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            self.is_high().map(|h| !h)
        }
    }

    /// Trigger pin counting rising edges
    #[derive(Default)]
    struct MockTrigger {
        high: bool,
        pulses: u32,
    }

    impl ErrorType for MockTrigger {
        type Error = Infallible;
    }

    impl OutputPin for MockTrigger {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            if !self.high {
                self.pulses += 1;
            }
            self.high = true;
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn pair<'a>(
        now: &'a Cell<u32>,
        window_a: Option<(u32, u32)>,
        window_b: Option<(u32, u32)>,
    ) -> UltrasonicPair<MockTrigger, MockEcho<'a>, MockEcho<'a>, NoDelay, MockClock<'a>> {
        UltrasonicPair::new(
            MockTrigger::default(),
            MockEcho { now, window: window_a },
            MockEcho { now, window: window_b },
            NoDelay,
            MockClock { now },
            10_000,
        )
    }

    #[test]
    fn test_measures_pulse_width() {
        let now = Cell::new(0);
        let mut sensors = pair(&now, Some((100, 680)), None);

        let echo = sensors.measure_echo_us(Vessel::A).unwrap();
        assert!((578..=582).contains(&echo), "echo = {}", echo);
        assert_eq!(sensors.trigger.pulses, 1);
    }

    #[test]
    fn test_selects_vessel_echo_line() {
        let now = Cell::new(0);
        let mut sensors = pair(&now, None, Some((50, 50 + 1160)));

        let echo = sensors.measure_echo_us(Vessel::B).unwrap();
        assert!((1158..=1162).contains(&echo), "echo = {}", echo);
    }

    #[test]
    fn test_missing_echo_times_out() {
        let now = Cell::new(0);
        let mut sensors = pair(&now, None, None);

        assert_eq!(
            sensors.measure_echo_us(Vessel::A),
            Err(SensorError::Timeout)
        );
        // Gave up shortly after the timeout
        assert!(now.get() <= 10_005);
    }

    #[test]
    fn test_stuck_high_echo_times_out() {
        let now = Cell::new(0);
        let mut sensors = pair(&now, Some((0, u32::MAX)), None);

        assert_eq!(
            sensors.measure_echo_us(Vessel::A),
            Err(SensorError::Timeout)
        );
    }

    #[test]
    fn test_late_falling_edge_times_out() {
        let now = Cell::new(0);
        let mut sensors = pair(&now, Some((5_000, 20_000)), None);

        assert_eq!(
            sensors.measure_echo_us(Vessel::A),
            Err(SensorError::Timeout)
        );
    }
}
