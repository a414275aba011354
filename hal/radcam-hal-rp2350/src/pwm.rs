//! Servo PWM slice setup
//!
//! Hobby servos expect a pulse every 20 ms. A PWM slice counts
//! `sys_clk / divider` ticks per second and wraps after `top + 1`, so the
//! divider is chosen as the smallest one that fits a whole frame into the
//! 16-bit counter.

use embassy_rp::pwm::{ChannelAPin, ChannelBPin, Config, Pwm, PwmOutput, Slice};
use embassy_rp::Peri;
use fixed::types::extra::U4;
use fixed::FixedU16;

/// Servo frame rate
pub const SERVO_FRAME_HZ: u32 = 50;

/// Counter periods available in the 16-bit slice counter
const MAX_COUNTS: u64 = 1 << 16;

/// Smallest/largest divider in 1/16 units (8.4 fixed point)
const MIN_DIVIDER_X16: u64 = 16;
const MAX_DIVIDER_X16: u64 = (1 << 12) - 1;

/// Divider and wrap value for one PWM frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameTiming {
    /// Clock divider in 1/16 units
    pub divider_x16: u16,
    /// Counter wrap value
    pub top: u16,
}

impl FrameTiming {
    /// Compute timing for `frame_hz` from the system clock
    ///
    /// Returns `None` if the frame cannot be represented (clock too fast or
    /// too slow for the divider range).
    pub fn for_frame(sys_clk_hz: u32, frame_hz: u32) -> Option<Self> {
        if frame_hz == 0 {
            return None;
        }
        let clk_x16 = sys_clk_hz as u64 * 16;
        let divider_x16 = clk_x16
            .div_ceil(frame_hz as u64 * MAX_COUNTS)
            .max(MIN_DIVIDER_X16);
        if divider_x16 > MAX_DIVIDER_X16 {
            return None;
        }
        let counts = clk_x16 / (divider_x16 * frame_hz as u64);
        let top = u16::try_from(counts.checked_sub(1)?).ok()?;
        Some(Self {
            divider_x16: divider_x16 as u16,
            top,
        })
    }

    /// Build a slice configuration with both outputs idle
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.divider = FixedU16::<U4>::from_bits(self.divider_x16);
        config.top = self.top;
        config.compare_a = 0;
        config.compare_b = 0;
        config
    }
}

/// Slice configuration for 50 Hz servo frames
pub fn servo_config(sys_clk_hz: u32) -> Option<Config> {
    FrameTiming::for_frame(sys_clk_hz, SERVO_FRAME_HZ).map(|timing| timing.config())
}

/// Split one slice into two servo outputs
pub fn servo_pair<'d, T: Slice>(
    slice: Peri<'d, T>,
    a: Peri<'d, impl ChannelAPin<T>>,
    b: Peri<'d, impl ChannelBPin<T>>,
    config: &Config,
) -> (Option<PwmOutput<'d>>, Option<PwmOutput<'d>>) {
    Pwm::new_output_ab(slice, a, b, config.clone()).split()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Frame length in nanoseconds for a timing at `sys_clk_hz`
    fn frame_ns(timing: &FrameTiming, sys_clk_hz: u32) -> u64 {
        (timing.top as u64 + 1) * timing.divider_x16 as u64 * 1_000_000_000
            / (16 * sys_clk_hz as u64)
    }

    #[test]
    fn test_frame_timing_150mhz() {
        let timing = FrameTiming::for_frame(150_000_000, SERVO_FRAME_HZ).unwrap();
        // 150 MHz * 16 / (50 * 65536) = 732.4 -> 733/16
        assert_eq!(timing.divider_x16, 733);
        assert_eq!(timing.top, 65483);
        assert!(frame_ns(&timing, 150_000_000).abs_diff(20_000_000) < 2_000);
    }

    #[test]
    fn test_frame_timing_125mhz() {
        let timing = FrameTiming::for_frame(125_000_000, SERVO_FRAME_HZ).unwrap();
        // 125 MHz * 16 / (50 * 65536) = 610.4 -> 611/16
        assert_eq!(timing.divider_x16, 611);
        assert_eq!(timing.top, 65465);
        assert!(frame_ns(&timing, 125_000_000).abs_diff(20_000_000) < 2_000);
    }

    #[test]
    fn test_slow_clock_uses_minimum_divider() {
        let timing = FrameTiming::for_frame(1_000_000, SERVO_FRAME_HZ).unwrap();
        assert_eq!(timing.divider_x16, 16);
        assert_eq!(timing.top, 19_999);
    }

    #[test]
    fn test_unrepresentable_frames() {
        assert_eq!(FrameTiming::for_frame(150_000_000, 0), None);
        // Needs a divider above 255 15/16
        assert_eq!(FrameTiming::for_frame(1_000_000_000, SERVO_FRAME_HZ), None);
        // Fewer than one count per frame
        assert_eq!(FrameTiming::for_frame(10, SERVO_FRAME_HZ), None);
    }
}
