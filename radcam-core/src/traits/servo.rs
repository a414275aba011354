//! Servo output trait
//!
//! The motion controller computes a 16-bit duty value for each axis; an
//! implementation only has to put it on the right PWM channel.

use radcam_protocol::Axis;

/// Errors that can occur when driving a servo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServoError {
    /// No output is wired to this axis
    NotConnected,
    /// The PWM peripheral rejected the write
    Hardware,
}

/// Sink for servo duty-cycle updates
pub trait ServoOutput {
    /// Set the duty for an axis
    ///
    /// `duty` is a fraction of the 20 ms servo period scaled to
    /// `0..=65535`.
    fn write_duty(&mut self, axis: Axis, duty: u16) -> Result<(), ServoError>;
}
