//! Configuration types
//!
//! Board-agnostic configuration structures, the configuration text parser
//! and the persisted target record.

pub mod axes;
pub mod parse;
pub mod targets;

pub use axes::*;
pub use parse::parse_config;
pub use targets::{AxisTargets, TargetsError, MAX_TARGETS_SIZE};
