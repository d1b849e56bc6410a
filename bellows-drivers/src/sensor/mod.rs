//! Range sensor implementations

pub mod ultrasonic;

pub use ultrasonic::{MicrosClock, UltrasonicPair};
