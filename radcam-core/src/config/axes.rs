//! Per-axis configuration types
//!
//! Pulse-width ranges and slew timing for each servo, plus the optional
//! validation window applied to commanded targets.

use radcam_protocol::Axis;

/// Target every axis starts at when nothing has been persisted
pub const DEFAULT_TARGET_US: u16 = 1500;

/// Default full-range traversal time in milliseconds
pub const DEFAULT_SLEW_MS: u32 = 2000;

/// Default servo update rate (one update per 20 ms servo frame)
pub const DEFAULT_TICK_RATE_HZ: u16 = 50;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unknown or malformed `[section]` header
    InvalidSection { line: u16 },
    /// Key not valid in the current section
    UnknownKey { line: u16 },
    /// Value could not be parsed, or line is not `key = value`
    InvalidValue { line: u16 },
    /// Range minimum is above its maximum
    InvalidRange(Axis),
    /// Slew time is zero
    InvalidSlew(Axis),
    /// Tick rate is zero
    InvalidTickRate(Axis),
    /// Validation window is incomplete or inverted
    InvalidWindow,
}

/// Legal pulse-width bounds for an axis in microseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisRange {
    /// Lowest pulse width
    pub min_us: u16,
    /// Highest pulse width
    pub max_us: u16,
}

impl AxisRange {
    /// Create a range
    pub const fn new(min_us: u16, max_us: u16) -> Self {
        Self { min_us, max_us }
    }

    /// Width of the range in microseconds
    pub fn span(&self) -> u16 {
        self.max_us.saturating_sub(self.min_us)
    }

    /// Check if a pulse width lies within the range (inclusive)
    pub fn contains(&self, us: u16) -> bool {
        us >= self.min_us && us <= self.max_us
    }

    /// Check that the bounds are ordered
    pub fn is_valid(&self) -> bool {
        self.min_us <= self.max_us
    }
}

/// Slew timing for an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionConfig {
    /// Milliseconds to traverse the full range
    pub slew_ms: u32,
    /// Intended update frequency
    pub tick_rate_hz: u16,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            slew_ms: DEFAULT_SLEW_MS,
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
        }
    }
}

impl MotionConfig {
    /// Largest change in pulse width allowed per update
    ///
    /// `max(1, floor(span / (slew_seconds * tick_rate_hz)))`, in integer
    /// milliseconds so that decimal slew times divide exactly.
    pub fn max_step(&self, range: &AxisRange) -> u16 {
        // Ticks per sweep, scaled by 1000
        let ticks_x1000 = self.slew_ms as u64 * self.tick_rate_hz as u64;
        if ticks_x1000 == 0 {
            return u16::MAX;
        }
        let step = range.span() as u64 * 1000 / ticks_x1000;
        step.clamp(1, u16::MAX as u64) as u16
    }

    /// Check if a full update period has passed
    pub fn period_elapsed(&self, elapsed_ms: u64) -> bool {
        elapsed_ms.saturating_mul(self.tick_rate_hz as u64) >= 1000
    }
}

/// Complete configuration for one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisConfig {
    /// Calibrated pulse-width range
    pub range: AxisRange,
    /// Slew timing
    pub motion: MotionConfig,
}

impl AxisConfig {
    /// Create an axis config with default slew timing
    pub fn with_range(min_us: u16, max_us: u16) -> Self {
        Self {
            range: AxisRange::new(min_us, max_us),
            motion: MotionConfig::default(),
        }
    }
}

/// Gimbal configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GimbalConfig {
    /// Per-axis configuration, indexed by [`Axis::index`]
    pub axes: [AxisConfig; Axis::COUNT],
    /// Accepted target window
    ///
    /// When set, commanded targets outside it are rejected. Disabled by
    /// default: targets are accepted as sent.
    pub target_window: Option<AxisRange>,
}

impl Default for GimbalConfig {
    fn default() -> Self {
        Self {
            axes: [
                AxisConfig::with_range(1000, 2000), // Tilt
                AxisConfig::with_range(900, 2100),  // Zoom
                AxisConfig::with_range(900, 2100),  // Focus
                AxisConfig::with_range(1000, 2000), // Yaw
            ],
            target_window: None,
        }
    }
}

impl GimbalConfig {
    /// Get the configuration for an axis
    pub fn axis(&self, axis: Axis) -> &AxisConfig {
        &self.axes[axis.index()]
    }

    /// Get the configuration for an axis mutably
    pub fn axis_mut(&mut self, axis: Axis) -> &mut AxisConfig {
        &mut self.axes[axis.index()]
    }

    /// Check ranges, slew timing and the validation window
    pub fn validate(&self) -> Result<(), ConfigError> {
        for axis in Axis::ALL {
            let cfg = self.axis(axis);
            if !cfg.range.is_valid() {
                return Err(ConfigError::InvalidRange(axis));
            }
            if cfg.motion.slew_ms == 0 {
                return Err(ConfigError::InvalidSlew(axis));
            }
            if cfg.motion.tick_rate_hz == 0 {
                return Err(ConfigError::InvalidTickRate(axis));
            }
        }

        match self.target_window {
            Some(window) if !window.is_valid() => Err(ConfigError::InvalidWindow),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GimbalConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.axis(Axis::Zoom).range, AxisRange::new(900, 2100));
        assert_eq!(config.target_window, None);
    }

    #[test]
    fn test_max_step_reference_values() {
        let motion = MotionConfig {
            slew_ms: 2000,
            tick_rate_hz: 50,
        };
        // 1200 / (2 * 50) = 12
        assert_eq!(motion.max_step(&AxisRange::new(900, 2100)), 12);
        // 1000 / 100 = 10
        assert_eq!(motion.max_step(&AxisRange::new(1000, 2000)), 10);
        // 150 / 100 = 1.5 -> floor
        assert_eq!(motion.max_step(&AxisRange::new(1000, 1150)), 1);
    }

    #[test]
    fn test_max_step_tenths_of_a_second() {
        // 1200 / (0.3 * 50) = 80 exactly
        let motion = MotionConfig {
            slew_ms: 300,
            tick_rate_hz: 50,
        };
        assert_eq!(motion.max_step(&AxisRange::new(900, 2100)), 80);
        assert_eq!(motion.max_step(&AxisRange::new(1000, 1600)), 40);

        // 600 / (0.3 * 25) = 80, 1500 / 7.5 = 200
        let motion = MotionConfig {
            slew_ms: 300,
            tick_rate_hz: 25,
        };
        assert_eq!(motion.max_step(&AxisRange::new(1000, 1600)), 80);
        assert_eq!(motion.max_step(&AxisRange::new(500, 2000)), 200);

        // 1000 / (0.7 * 100) = 14.28 -> floor
        let motion = MotionConfig {
            slew_ms: 700,
            tick_rate_hz: 100,
        };
        assert_eq!(motion.max_step(&AxisRange::new(1000, 2000)), 14);
    }

    #[test]
    fn test_max_step_zero_slew_saturates() {
        let motion = MotionConfig {
            slew_ms: 0,
            tick_rate_hz: 50,
        };
        assert_eq!(motion.max_step(&AxisRange::new(1000, 2000)), u16::MAX);
    }

    #[test]
    fn test_max_step_never_below_one() {
        let motion = MotionConfig {
            slew_ms: 100_000,
            tick_rate_hz: 50,
        };
        assert_eq!(motion.max_step(&AxisRange::new(1500, 1510)), 1);
        assert_eq!(motion.max_step(&AxisRange::new(1500, 1500)), 1);
    }

    #[test]
    fn test_period_elapsed() {
        let motion = MotionConfig::default();
        assert!(!motion.period_elapsed(0));
        assert!(!motion.period_elapsed(19));
        assert!(motion.period_elapsed(20));
        assert!(motion.period_elapsed(u64::MAX));

        let slow = MotionConfig {
            slew_ms: 1000,
            tick_rate_hz: 3,
        };
        // 1/3 s is not a whole number of milliseconds
        assert!(!slow.period_elapsed(333));
        assert!(slow.period_elapsed(334));
    }

    #[test]
    fn test_range_helpers() {
        let range = AxisRange::new(1000, 2000);
        assert_eq!(range.span(), 1000);
        assert!(range.contains(1000));
        assert!(range.contains(2000));
        assert!(!range.contains(999));
        assert!(!range.contains(2001));

        let inverted = AxisRange::new(2000, 1000);
        assert!(!inverted.is_valid());
        assert_eq!(inverted.span(), 0);
    }

    #[test]
    fn test_validate_rejects_bad_axes() {
        let mut config = GimbalConfig::default();
        config.axis_mut(Axis::Yaw).range = AxisRange::new(2000, 1000);
        assert_eq!(config.validate(), Err(ConfigError::InvalidRange(Axis::Yaw)));

        let mut config = GimbalConfig::default();
        config.axis_mut(Axis::Tilt).motion.slew_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidSlew(Axis::Tilt)));

        let mut config = GimbalConfig::default();
        config.axis_mut(Axis::Focus).motion.tick_rate_hz = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidTickRate(Axis::Focus))
        );

        let mut config = GimbalConfig::default();
        config.target_window = Some(AxisRange::new(2000, 1000));
        assert_eq!(config.validate(), Err(ConfigError::InvalidWindow));
    }
}
