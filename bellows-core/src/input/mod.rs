//! Operator inputs

pub mod debounce;

pub use debounce::{ButtonDebouncer, Press};
