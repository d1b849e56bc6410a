//! Bellows - Ventilator Simulator Firmware
//!
//! Main firmware binary for RP2040-based bellows rigs.
//! Two pumps move water between vessels A and B; the rising and falling
//! water drives the bellows while two solenoids steer the air.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use {defmt_rtt as _, panic_probe as _};

use bellows_core::control::CycleController;

mod board;
mod config;
mod tasks;

use crate::board::Board;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Bellows firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Embedded configuration, or built-in defaults if it is rejected
    let config = config::load_config();
    config::log_summary(&config);

    let controller = unwrap!(CycleController::new(config));

    // Pin assignments are board-specific (see board.rs)
    let board = unwrap!(Board::new(p, controller.config()));
    info!(
        "Board initialized, echo timeout {}us",
        board.rangefinders.timeout_us()
    );

    unwrap!(spawner.spawn(tasks::control_task(controller, board)));

    info!("Control task spawned, firmware running");

    // All work happens in the control task
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
