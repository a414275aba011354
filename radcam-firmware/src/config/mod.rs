//! Configuration loading and target persistence
//!
//! Axis configuration comes from the embedded gimbal.toml; the last
//! commanded targets are kept in flash.

pub mod loader;
pub mod targets;

pub use loader::load_config;
pub use targets::{load_targets, save_targets};
