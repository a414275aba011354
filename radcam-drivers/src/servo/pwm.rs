//! Hobby servos on PWM channels
//!
//! Each axis is wired to one PWM output running at the 50 Hz servo frame
//! rate. The motion controller hands over a duty value scaled to
//! `0..=65535`; this driver rescales it to the channel's own resolution.

use embedded_hal::pwm::SetDutyCycle;
use radcam_core::motion::DUTY_FULL_SCALE;
use radcam_core::traits::{ServoError, ServoOutput};
use radcam_core::Axis;

/// One PWM channel per axis
pub struct PwmServoBank<P> {
    channels: [Option<P>; Axis::COUNT],
}

impl<P> Default for PwmServoBank<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> PwmServoBank<P> {
    /// Create a bank with no channels attached
    pub fn new() -> Self {
        Self {
            channels: core::array::from_fn(|_| None),
        }
    }

    /// Attach a channel to an axis, returning any channel it replaces
    pub fn attach(&mut self, axis: Axis, channel: P) -> Option<P> {
        self.channels[axis.index()].replace(channel)
    }

    /// Check if an axis has a channel
    pub fn is_attached(&self, axis: Axis) -> bool {
        self.channels[axis.index()].is_some()
    }
}

impl<P: SetDutyCycle> ServoOutput for PwmServoBank<P> {
    fn write_duty(&mut self, axis: Axis, duty: u16) -> Result<(), ServoError> {
        let channel = self.channels[axis.index()]
            .as_mut()
            .ok_or(ServoError::NotConnected)?;
        channel
            .set_duty_cycle_fraction(duty, DUTY_FULL_SCALE)
            .map_err(|_| ServoError::Hardware)
    }
}
