//! Board-agnostic core logic for the gimbal controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Slew-rate limited servo motion
//! - Zoom-tracking autofocus from calibration curves
//! - Request routing (typed commands to motion/autofocus)
//! - Configuration types and the persisted target record
//! - The servo output trait implemented by drivers

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod focus;
pub mod gimbal;
pub mod motion;
pub mod router;
pub mod traits;

pub use gimbal::{Gimbal, Receive};
pub use radcam_protocol::Axis;
