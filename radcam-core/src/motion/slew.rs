//! Slew-rate limited servo positioning
//!
//! Commanded targets are not applied directly. Each axis ramps its driven
//! ("actual") pulse width toward the target by at most `max_step` per
//! update, and updates no more often than its configured tick rate. Axes
//! are scheduled independently: each keeps its own last-update timestamp.
//!
//! A full-range move therefore takes roughly `slew_seconds`, and an axis
//! that has reached its target stops producing servo writes.

use radcam_protocol::Axis;

use crate::config::{AxisConfig, AxisTargets, GimbalConfig};
use crate::traits::ServoOutput;

use super::duty::duty_from_us;

/// Per-axis motion state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisState {
    /// Last commanded pulse width
    pub target_us: u16,
    /// Pulse width currently driven to the servo
    pub actual_us: u16,
    /// Time of the most recent servo write (ms)
    pub last_tick_ms: u64,
}

impl AxisState {
    /// Create a settled state at `us`
    pub const fn settled_at(us: u16) -> Self {
        Self {
            target_us: us,
            actual_us: us,
            last_tick_ms: 0,
        }
    }

    /// Check if the driven position has reached the target
    pub fn is_settled(&self) -> bool {
        self.actual_us == self.target_us
    }
}

/// Outcome of one motion update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// Axes that stepped and were written
    pub moved: u8,
    /// Axes whose servo write failed
    pub failed: u8,
}

impl TickReport {
    /// Check if no axis moved
    pub fn is_idle(&self) -> bool {
        self.moved == 0
    }
}

/// Owns target/actual state for every axis
#[derive(Debug, Clone)]
pub struct MotionController {
    axes: [AxisConfig; Axis::COUNT],
    max_steps: [u16; Axis::COUNT],
    state: [AxisState; Axis::COUNT],
}

impl MotionController {
    /// Create a controller with every axis settled at its stored target
    pub fn new(config: &GimbalConfig, targets: &AxisTargets) -> Self {
        let axes = config.axes;
        let max_steps = axes.map(|axis| axis.motion.max_step(&axis.range));
        let state = targets.targets.map(AxisState::settled_at);
        Self {
            axes,
            max_steps,
            state,
        }
    }

    /// Set the target for an axis
    ///
    /// The value is stored as-is; the servo moves toward it on later ticks.
    pub fn set_target(&mut self, axis: Axis, us: u16) {
        self.state[axis.index()].target_us = us;
    }

    /// Get the target for an axis
    pub fn target(&self, axis: Axis) -> u16 {
        self.state[axis.index()].target_us
    }

    /// Get the driven pulse width for an axis
    pub fn actual(&self, axis: Axis) -> u16 {
        self.state[axis.index()].actual_us
    }

    /// Get the full state for an axis
    pub fn state(&self, axis: Axis) -> &AxisState {
        &self.state[axis.index()]
    }

    /// Largest per-tick change for an axis
    pub fn max_step(&self, axis: Axis) -> u16 {
        self.max_steps[axis.index()]
    }

    /// Get the configuration for an axis
    pub fn config(&self, axis: Axis) -> &AxisConfig {
        &self.axes[axis.index()]
    }

    /// Check if every axis has reached its target
    pub fn is_settled(&self) -> bool {
        self.state.iter().all(AxisState::is_settled)
    }

    /// Snapshot the targets for persistence
    pub fn targets(&self) -> AxisTargets {
        let mut targets = AxisTargets::new();
        targets.targets = self.state.map(|s| s.target_us);
        targets
    }

    /// Write the current driven position of every axis
    ///
    /// Used once at startup so the servos hold their restored positions.
    pub fn prime<S: ServoOutput>(&mut self, now_ms: u64, output: &mut S) -> TickReport {
        let mut report = TickReport::default();
        for axis in Axis::ALL {
            let state = &mut self.state[axis.index()];
            state.last_tick_ms = state.last_tick_ms.max(now_ms);
            report.moved += 1;
            if output.write_duty(axis, duty_from_us(state.actual_us)).is_err() {
                report.failed += 1;
            }
        }
        report
    }

    /// Advance every unsettled axis whose update period has elapsed
    ///
    /// Each eligible axis moves toward its target by at most its max step
    /// without crossing it, is written to `output`, and records `now_ms`.
    /// A failed write is counted in the report; the step is kept.
    pub fn tick<S: ServoOutput>(&mut self, now_ms: u64, output: &mut S) -> TickReport {
        let mut report = TickReport::default();

        for axis in Axis::ALL {
            let index = axis.index();
            let state = &mut self.state[index];
            if state.is_settled() {
                continue;
            }

            let elapsed_ms = now_ms.saturating_sub(state.last_tick_ms);
            if !self.axes[index].motion.period_elapsed(elapsed_ms) {
                continue;
            }

            let step = state
                .target_us
                .abs_diff(state.actual_us)
                .min(self.max_steps[index]);
            state.actual_us = if state.target_us > state.actual_us {
                state.actual_us + step
            } else {
                state.actual_us - step
            };
            state.last_tick_ms = now_ms;

            report.moved += 1;
            if output.write_duty(axis, duty_from_us(state.actual_us)).is_err() {
                report.failed += 1;
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AxisConfig, MotionConfig};
    use crate::motion::duty::duty_from_us;
    use crate::traits::ServoError;
    use heapless::Vec;

    /// Records every write
    #[derive(Default)]
    struct MockServos {
        writes: Vec<(Axis, u16), 256>,
        fail: Option<Axis>,
    }

    impl ServoOutput for MockServos {
        fn write_duty(&mut self, axis: Axis, duty: u16) -> Result<(), ServoError> {
            let _ = self.writes.push((axis, duty));
            if self.fail == Some(axis) {
                return Err(ServoError::Hardware);
            }
            Ok(())
        }
    }

    /// Zoom range span 1200, 2 s slew at 50 Hz -> max step 12
    fn controller() -> MotionController {
        MotionController::new(&GimbalConfig::default(), &AxisTargets::new())
    }

    #[test]
    fn test_initial_state_is_settled() {
        let motion = controller();
        assert!(motion.is_settled());
        for axis in Axis::ALL {
            assert_eq!(motion.target(axis), 1500);
            assert_eq!(motion.actual(axis), 1500);
        }
        assert_eq!(motion.max_step(Axis::Zoom), 12);
        assert_eq!(motion.max_step(Axis::Tilt), 10);
    }

    #[test]
    fn test_set_target_does_not_move() {
        let mut motion = controller();
        motion.set_target(Axis::Zoom, 2000);
        assert_eq!(motion.target(Axis::Zoom), 2000);
        assert_eq!(motion.actual(Axis::Zoom), 1500);
        assert!(!motion.is_settled());
    }

    #[test]
    fn test_ramp_to_target() {
        let mut motion = controller();
        let mut servos = MockServos::default();
        motion.set_target(Axis::Zoom, 2000);

        let mut previous = motion.actual(Axis::Zoom);
        let mut ticks = 0;
        let mut now = 0;
        while !motion.state(Axis::Zoom).is_settled() {
            now += 20;
            let report = motion.tick(now, &mut servos);
            assert_eq!(report.moved, 1);
            let actual = motion.actual(Axis::Zoom);
            assert!(actual > previous);
            assert!(actual - previous <= 12);
            assert!(actual <= 2000);
            previous = actual;
            ticks += 1;
        }

        // ceil(500 / 12) = 42
        assert_eq!(ticks, 42);
        assert_eq!(motion.actual(Axis::Zoom), 2000);

        // Converged: further ticks do nothing
        servos.writes.clear();
        let report = motion.tick(now + 20, &mut servos);
        assert!(report.is_idle());
        assert!(servos.writes.is_empty());
    }

    #[test]
    fn test_ramp_down_clamps_at_target() {
        let mut motion = controller();
        let mut servos = MockServos::default();
        motion.set_target(Axis::Zoom, 1495);

        motion.tick(20, &mut servos);
        assert_eq!(motion.actual(Axis::Zoom), 1495);
        assert_eq!(servos.writes.as_slice(), &[(Axis::Zoom, duty_from_us(1495))]);
    }

    #[test]
    fn test_tick_respects_period() {
        let mut motion = controller();
        let mut servos = MockServos::default();
        motion.set_target(Axis::Zoom, 2000);

        motion.tick(20, &mut servos);
        assert_eq!(motion.actual(Axis::Zoom), 1512);

        // Too soon: no movement, no write
        let report = motion.tick(39, &mut servos);
        assert!(report.is_idle());
        assert_eq!(motion.actual(Axis::Zoom), 1512);
        assert_eq!(motion.state(Axis::Zoom).last_tick_ms, 20);

        // A long gap still only advances one step
        motion.tick(1000, &mut servos);
        assert_eq!(motion.actual(Axis::Zoom), 1524);
    }

    #[test]
    fn test_axes_are_scheduled_independently() {
        let mut motion = controller();
        let mut servos = MockServos::default();

        motion.set_target(Axis::Tilt, 2000);
        motion.tick(20, &mut servos);

        // Yaw commanded mid-period for tilt
        motion.set_target(Axis::Yaw, 1000);
        let report = motion.tick(30, &mut servos);
        assert_eq!(report.moved, 1);
        assert_eq!(motion.actual(Axis::Yaw), 1490);
        assert_eq!(motion.actual(Axis::Tilt), 1510);

        let report = motion.tick(40, &mut servos);
        assert_eq!(report.moved, 1);
        assert_eq!(motion.actual(Axis::Tilt), 1520);
        assert_eq!(motion.actual(Axis::Yaw), 1490);
    }

    #[test]
    fn test_time_going_backwards_is_ignored() {
        let mut motion = controller();
        let mut servos = MockServos::default();
        motion.set_target(Axis::Focus, 1600);

        motion.tick(100, &mut servos);
        let report = motion.tick(50, &mut servos);
        assert!(report.is_idle());
        assert_eq!(motion.state(Axis::Focus).last_tick_ms, 100);
    }

    #[test]
    fn test_target_outside_range_is_followed() {
        let mut motion = controller();
        let mut servos = MockServos::default();
        motion.set_target(Axis::Tilt, 2500);

        let mut now = 0;
        while !motion.is_settled() {
            now += 20;
            motion.tick(now, &mut servos);
        }
        assert_eq!(motion.actual(Axis::Tilt), 2500);
    }

    #[test]
    fn test_retarget_mid_move() {
        let mut motion = controller();
        let mut servos = MockServos::default();
        motion.set_target(Axis::Zoom, 2000);
        motion.tick(20, &mut servos);
        motion.tick(40, &mut servos);
        assert_eq!(motion.actual(Axis::Zoom), 1524);

        motion.set_target(Axis::Zoom, 1500);
        motion.tick(60, &mut servos);
        assert_eq!(motion.actual(Axis::Zoom), 1512);
    }

    #[test]
    fn test_failed_write_still_steps() {
        let mut motion = controller();
        let mut servos = MockServos {
            fail: Some(Axis::Yaw),
            ..Default::default()
        };
        motion.set_target(Axis::Yaw, 1600);
        motion.set_target(Axis::Tilt, 1600);

        let report = motion.tick(20, &mut servos);
        assert_eq!(report, TickReport { moved: 2, failed: 1 });
        assert_eq!(motion.actual(Axis::Yaw), 1510);
    }

    #[test]
    fn test_prime_writes_every_axis() {
        let mut targets = AxisTargets::new();
        targets.set(Axis::Focus, 1700);
        let mut motion = MotionController::new(&GimbalConfig::default(), &targets);
        let mut servos = MockServos::default();

        let report = motion.prime(5, &mut servos);
        assert_eq!(report.moved, Axis::COUNT as u8);
        assert_eq!(servos.writes.len(), Axis::COUNT);
        assert!(servos.writes.contains(&(Axis::Focus, duty_from_us(1700))));
        assert_eq!(motion.state(Axis::Tilt).last_tick_ms, 5);
    }

    #[test]
    fn test_targets_snapshot() {
        let mut motion = controller();
        motion.set_target(Axis::Yaw, 1234);
        let targets = motion.targets();
        assert_eq!(targets.get(Axis::Yaw), 1234);
        assert_eq!(targets.get(Axis::Tilt), 1500);
        assert!(targets.is_valid());
    }

    #[test]
    fn test_custom_slew_config() {
        let mut config = GimbalConfig::default();
        config.axes[Axis::Tilt.index()] = AxisConfig {
            range: crate::config::AxisRange::new(1000, 2000),
            motion: MotionConfig {
                slew_ms: 500,
                tick_rate_hz: 100,
            },
        };
        let mut motion = MotionController::new(&config, &AxisTargets::new());
        let mut servos = MockServos::default();
        // 1000 / 50 = 20 per 10 ms
        assert_eq!(motion.max_step(Axis::Tilt), 20);

        motion.set_target(Axis::Tilt, 1600);
        motion.tick(10, &mut servos);
        assert_eq!(motion.actual(Axis::Tilt), 1520);
    }
}
