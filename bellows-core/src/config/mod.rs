//! Configuration types
//!
//! Startup-only configuration. Values are fixed for the life of the
//! process; nothing is persisted.

pub mod parser;
pub mod thresholds;
pub mod types;

pub use parser::{parse_config, ParseError};
pub use thresholds::Thresholds;
pub use types::*;
