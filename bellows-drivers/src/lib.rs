//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in bellows-core on top of embedded-hal 1.0:
//!
//! - Range finders (HC-SR04 style ultrasonic pair on a shared trigger)
//! - Pump drivers (dual-winding PWM)
//! - Valve drivers (GPIO solenoid)
//! - Indicators (GPIO LED)

#![no_std]
#![deny(unsafe_code)]

pub mod indicator;
pub mod motor;
pub mod sensor;
pub mod valve;
