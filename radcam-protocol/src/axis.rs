//! Gimbal axis identifiers
//!
//! The axis set is closed and fixed at compile time. Wire names are the
//! lowercase query-parameter keys used by `/set?<axis>=<value>`.

/// Controllable degree of freedom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// Camera tilt (pitch)
    Tilt,
    /// Lens zoom
    Zoom,
    /// Lens focus
    Focus,
    /// Pan (yaw)
    Yaw,
}

impl Axis {
    /// Number of axes
    pub const COUNT: usize = 4;

    /// All axes in index order
    pub const ALL: [Axis; Axis::COUNT] = [Axis::Tilt, Axis::Zoom, Axis::Focus, Axis::Yaw];

    /// Index of this axis into per-axis arrays
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Wire name of this axis
    pub const fn name(self) -> &'static str {
        match self {
            Axis::Tilt => "tilt",
            Axis::Zoom => "zoom",
            Axis::Focus => "focus",
            Axis::Yaw => "yaw",
        }
    }

    /// Human-readable label
    pub const fn label(self) -> &'static str {
        match self {
            Axis::Tilt => "Tilt",
            Axis::Zoom => "Zoom",
            Axis::Focus => "Focus",
            Axis::Yaw => "Yaw",
        }
    }

    /// Look up an axis by wire name
    ///
    /// Returns `None` for any name outside the axis set. Matching is exact
    /// and case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|axis| axis.name() == name)
    }
}
