//! Gimbal composition
//!
//! Owns every piece of controller state and exposes the two operations the
//! control loop performs: advance motion, and handle received bytes.

use radcam_protocol::{FrameError, StreamFramer};

use crate::config::{AxisTargets, GimbalConfig};
use crate::focus::AutofocusEngine;
use crate::motion::{MotionController, TickReport};
use crate::router::{CommandRouter, Dispatch};
use crate::traits::ServoOutput;

/// Outcome of feeding received bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Receive {
    /// No complete frame yet
    Idle,
    /// The pending bytes were discarded without a frame
    Dropped(FrameError),
    /// A frame was routed
    Handled(Dispatch),
}

/// Complete controller state
#[derive(Debug, Clone)]
pub struct Gimbal {
    config: GimbalConfig,
    motion: MotionController,
    autofocus: AutofocusEngine,
    router: CommandRouter,
    framer: StreamFramer,
}

impl Gimbal {
    /// Create a gimbal with the built-in calibration curves
    pub fn new(config: &GimbalConfig, targets: &AxisTargets) -> Self {
        Self::with_autofocus(config, targets, AutofocusEngine::default())
    }

    /// Create a gimbal with a specific autofocus engine
    pub fn with_autofocus(
        config: &GimbalConfig,
        targets: &AxisTargets,
        autofocus: AutofocusEngine,
    ) -> Self {
        Self {
            config: *config,
            motion: MotionController::new(config, targets),
            autofocus,
            router: CommandRouter::new(config.target_window),
            framer: StreamFramer::new(),
        }
    }

    /// Drive every servo to its restored position
    pub fn prime<S: ServoOutput>(&mut self, now_ms: u64, output: &mut S) -> TickReport {
        self.motion.prime(now_ms, output)
    }

    /// Advance motion by one loop iteration
    pub fn tick<S: ServoOutput>(&mut self, now_ms: u64, output: &mut S) -> TickReport {
        self.motion.tick(now_ms, output)
    }

    /// Feed received bytes and route a frame if one completed
    pub fn receive(&mut self, bytes: &[u8]) -> Receive {
        if let Err(err) = self.framer.feed(bytes) {
            return Receive::Dropped(err);
        }

        match self.framer.try_take_frame() {
            Ok(None) => Receive::Idle,
            Ok(Some(frame)) => Receive::Handled(self.router.route(
                frame.request_line(),
                &mut self.motion,
                &self.autofocus,
            )),
            Err(err) => Receive::Dropped(err),
        }
    }

    /// Drop any partially received frame
    pub fn discard_pending(&mut self) {
        self.framer.reset();
    }

    /// Motion state
    pub fn motion(&self) -> &MotionController {
        &self.motion
    }

    /// Current targets, for persistence and page rendering
    pub fn targets(&self) -> AxisTargets {
        self.motion.targets()
    }

    /// Active configuration
    pub fn config(&self) -> &GimbalConfig {
        &self.config
    }

    /// Autofocus engine
    pub fn autofocus(&self) -> &AutofocusEngine {
        &self.autofocus
    }

    /// Request router
    pub fn router(&self) -> &CommandRouter {
        &self.router
    }
}
