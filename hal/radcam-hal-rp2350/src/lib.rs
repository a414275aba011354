//! RP2350-specific HAL for the gimbal controller firmware
//!
//! This crate provides RP2350 implementations of the shared `radcam-hal`
//! traits, plus RP2350-specific setup:
//!
//! - Flash storage driver (implements `radcam_hal::FlashStorage`)
//! - 50 Hz servo PWM slice configuration

#![no_std]

pub mod flash;
pub mod pwm;

pub use flash::Rp2350FlashStorage;
