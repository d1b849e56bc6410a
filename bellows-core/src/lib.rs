//! Board-agnostic core logic for the bellows ventilator simulator
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (range finder, pump, valve, indicator)
//! - Phase state machine (stopped / inhaling / exhaling)
//! - Cycle controller and threshold policy
//! - Pump drive ramping
//! - Button debouncing
//! - Sensor health tracking
//! - Configuration type definitions
//!
//! # Features
//!
//! - `defmt`: `defmt::Format` for the public types.
//! - `serde`: `Deserialize` for the configuration types.
//! - `toml`: `ControlConfig::from_toml` for host-side tools. It needs
//!   `alloc::sync::Arc`, so it is not available on thumbv6m; firmware
//!   reads its configuration with the heap-free
//!   [`config::parse_config`] instead. Not enabled by default, so its
//!   tests run with `cargo test -p bellows-core --features toml`.

#![no_std]
#![deny(unsafe_code)]

pub mod actuator;
pub mod config;
pub mod control;
pub mod input;
pub mod motion;
pub mod safety;
pub mod sensor;
pub mod state;
pub mod traits;
