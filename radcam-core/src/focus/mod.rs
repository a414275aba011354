//! Zoom-tracking autofocus
//!
//! Calibration curves and the focus calculation built on them.

pub mod autofocus;
pub mod table;

pub use autofocus::{AutofocusEngine, MARGIN_GAIN};
pub use table::{Breakpoint, CalibrationError, CalibrationTable, CLOSEST_FOCUS, FURTHEST_FOCUS};
