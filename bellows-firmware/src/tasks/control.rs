//! Cycle control task
//!
//! Samples the button, both rangefinders and the float switches, runs one
//! controller tick, then drives pumps, valves and the status LED from the
//! result. Sleeps `tick_interval_ms` after every tick.

use defmt::*;
use embassy_time::{Instant, Timer};

use bellows_core::control::{CycleController, StatusReport, TickInput, TickOutput};
use bellows_core::safety::SensorHealth;
use bellows_core::state::SystemPhase;
use bellows_core::traits::{IndicatorOutput, PumpOutput, RangeFinder, ValveOutput, Vessel};

use crate::board::Board;

/// Control task
#[embassy_executor::task]
pub async fn control_task(controller: CycleController, mut board: Board) {
    info!("Control task started");

    let mut state = controller.initial_state();
    let mut last_phase = SystemPhase::Stopped;
    let mut last_health = SensorHealth::Ok;
    let tick_ms = u64::from(controller.config().timing.tick_interval_ms);

    loop {
        let input = sample(&mut board);
        let output = controller.tick(&mut state, &input);

        if let Some(press) = output.report.press {
            debug!("Button press at {}ms", press.at_ms);
        }

        if output.report.phase != last_phase {
            log_phase_change(last_phase, &output.report);
            last_phase = output.report.phase;
        }

        if output.report.health != last_health {
            match output.report.health {
                SensorHealth::Degraded(vessel) => warn!(
                    "Rangefinder {} missed {} echoes in a row ({:?}), reading as empty",
                    vessel,
                    state.sensors().consecutive_misses(vessel),
                    state.sensors().last_error(vessel)
                ),
                SensorHealth::Ok => info!("Rangefinders recovered"),
            }
            last_health = output.report.health;
        }

        trace!(
            "{} dir={} level={}cm",
            output.report.phase,
            output.report.directions,
            output.report.levels
        );

        apply(&mut board, &output);

        Timer::after_millis(tick_ms).await;
    }
}

/// Read every input for one tick
fn sample(board: &mut Board) -> TickInput {
    let now_ms = Instant::now().as_millis() as u32;
    let button = board.button.is_high();

    // Shared trigger: one ping per vessel, A first
    let echoes = Vessel::ALL.map(|vessel| board.rangefinders.measure_echo_us(vessel));
    let high_water = Vessel::ALL.map(|vessel| board.high_water(vessel));

    TickInput {
        now_ms,
        button,
        echoes,
        high_water,
    }
}

/// Drive every output; errors are logged and the loop carries on
fn apply(board: &mut Board, output: &TickOutput) {
    for (vessel, (pump, drive)) in Vessel::ALL
        .into_iter()
        .zip(board.pumps.iter_mut().zip(output.pumps))
    {
        if let Err(e) = pump.apply(drive) {
            error!("Pump {} PWM error: {:?}", vessel, Debug2Format(&e));
        }
    }

    let pattern = [output.valves.a, output.valves.b];
    for (vessel, (valve, state)) in Vessel::ALL
        .into_iter()
        .zip(board.valves.iter_mut().zip(pattern))
    {
        if let Err(e) = valve.set_state(state) {
            error!("Valve {} GPIO error: {:?}", vessel, Debug2Format(&e));
        }
    }

    if let Err(e) = board.led.set_lit(output.led) {
        error!("LED GPIO error: {:?}", Debug2Format(&e));
    }
}

fn log_phase_change(from: SystemPhase, report: &StatusReport) {
    match report.phase {
        SystemPhase::Stopped => info!("Cycle stopped (was {})", from),
        SystemPhase::Inhaling => info!(
            "Inhale: filling both vessels (A at {}cm, B at {}cm)",
            report.levels[0], report.levels[1]
        ),
        SystemPhase::Exhaling => info!(
            "Exhale: emptying both vessels (A at {}cm, B at {}cm)",
            report.levels[0], report.levels[1]
        ),
    }
}
