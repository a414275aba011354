//! Serial-to-network bridge drivers

pub mod ch9120;

pub use ch9120::{BridgeError, BridgeTiming, Ch9120};
