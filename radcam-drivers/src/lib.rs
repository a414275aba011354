//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in radcam-core, plus bring-up for the network bridge:
//!
//! - Servo output over any `embedded-hal` PWM channel
//! - CH9120 serial-to-Ethernet bridge mode control

#![no_std]
#![deny(unsafe_code)]

pub mod bridge;
pub mod servo;
