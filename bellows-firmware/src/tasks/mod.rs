//! Embassy async tasks
//!
//! A single control task owns every peripheral and runs the cycle loop.

pub mod control;

pub use control::control_task;
