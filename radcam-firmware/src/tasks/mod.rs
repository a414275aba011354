//! Embassy async tasks
//!
//! The whole controller runs as one loop that owns all gimbal state.

pub mod control;

pub use control::{discard_echo, ControlLoop, MAX_ECHO_DISCARD};
