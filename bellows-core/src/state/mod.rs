//! Phase state machine
//!
//! Defines the authoritative system phase. The state machine is
//! explicit, finite, and deterministic.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::SystemPhase;
