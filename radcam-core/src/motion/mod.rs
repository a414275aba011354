//! Servo motion
//!
//! Slew-rate limiting of commanded targets and pulse-width to duty
//! conversion.

pub mod duty;
pub mod slew;

pub use duty::{duty_from_us, DUTY_FULL_SCALE, SERVO_PERIOD_US};
pub use slew::{AxisState, MotionController, TickReport};
