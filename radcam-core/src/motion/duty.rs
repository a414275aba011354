//! Pulse width to duty cycle conversion
//!
//! Servos run on a fixed 50 Hz frame. A pulse width in microseconds maps
//! onto a 16-bit fraction of the 20 ms period.

/// Servo frame period in microseconds (50 Hz)
pub const SERVO_PERIOD_US: u32 = 20_000;

/// Duty value for a 100% duty cycle
pub const DUTY_FULL_SCALE: u16 = u16::MAX;

/// Convert a pulse width to a duty value
///
/// `round(us * 65535 / 20000)`, saturating at full scale for pulses
/// longer than the period.
pub fn duty_from_us(us: u16) -> u16 {
    // Max product 65535 * 65535 + 10000 fits in u32
    let duty = (us as u32 * DUTY_FULL_SCALE as u32 + SERVO_PERIOD_US / 2) / SERVO_PERIOD_US;
    duty.min(DUTY_FULL_SCALE as u32) as u16
}
