//! Valve driver implementations

pub mod solenoid;

pub use solenoid::Solenoid;
