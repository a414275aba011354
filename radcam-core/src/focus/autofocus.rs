//! Focus calculation from zoom position
//!
//! The client sends a focus reference alongside the zoom position. The
//! reference selects a point between the closest-focus and furthest-focus
//! curves at that zoom:
//!
//! ```text
//! focus_delta = 0.5 + margin_gain * (reference - 1500) / 400
//! focus       = closest + focus_delta * (furthest - closest)
//! ```
//!
//! `focus_delta` is deliberately not clamped to `[0, 1]`; the margin gain
//! lets a reference near the end of its travel reach slightly past either
//! curve.

use super::table::{CalibrationTable, CLOSEST_FOCUS, FURTHEST_FOCUS};

/// Gain applied to the focus reference offset
pub const MARGIN_GAIN: f32 = 1.05;

/// Focus reference that selects the midpoint between the curves
pub const FOCUS_REFERENCE_CENTER_US: f32 = 1500.0;

/// Focus reference travel that spans one full curve-to-curve interval
pub const FOCUS_REFERENCE_SPAN_US: f32 = 400.0;

/// Computes a focus target from zoom position and focus reference
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutofocusEngine {
    closest: CalibrationTable,
    furthest: CalibrationTable,
    margin_gain: f32,
}

impl Default for AutofocusEngine {
    fn default() -> Self {
        Self::new(CLOSEST_FOCUS, FURTHEST_FOCUS)
    }
}

impl AutofocusEngine {
    /// Create an engine from a closest-focus and a furthest-focus curve
    pub const fn new(closest: CalibrationTable, furthest: CalibrationTable) -> Self {
        Self {
            closest,
            furthest,
            margin_gain: MARGIN_GAIN,
        }
    }

    /// Override the margin gain
    pub const fn with_margin_gain(mut self, margin_gain: f32) -> Self {
        self.margin_gain = margin_gain;
        self
    }

    /// Closest-focus curve
    pub fn closest(&self) -> &CalibrationTable {
        &self.closest
    }

    /// Furthest-focus curve
    pub fn furthest(&self) -> &CalibrationTable {
        &self.furthest
    }

    /// Fraction of the way from the closest to the furthest curve
    pub fn focus_delta(&self, focus_reference_us: u16) -> f32 {
        0.5 + self.margin_gain * (focus_reference_us as f32 - FOCUS_REFERENCE_CENTER_US)
            / FOCUS_REFERENCE_SPAN_US
    }

    /// Focus target for a zoom position, truncated toward zero
    pub fn calculate_autofocus(&self, zoom_us: u16, focus_reference_us: u16) -> i32 {
        let focus_delta = self.focus_delta(focus_reference_us);
        let closest = self.closest.interpolate(zoom_us);
        let furthest = self.furthest.interpolate(zoom_us);
        (closest as f32 + focus_delta * (furthest - closest) as f32) as i32
    }
}
