//! Piecewise-linear calibration curves
//!
//! Each curve maps a zoom servo position to the focus servo position that
//! keeps a subject sharp at one end of the focus range. Both curves are
//! sampled at 200 µs zoom intervals.

/// One measured point on a calibration curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Breakpoint {
    /// Input position (zoom) in microseconds
    pub input_us: u16,
    /// Output position (focus) in microseconds
    pub output_us: u16,
}

impl Breakpoint {
    /// Create a breakpoint
    pub const fn new(input_us: u16, output_us: u16) -> Self {
        Self {
            input_us,
            output_us,
        }
    }
}

/// Calibration table errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationError {
    /// Table has no breakpoints
    Empty,
    /// Breakpoint inputs are not strictly increasing at this index
    NotIncreasing(usize),
}

/// An immutable, sorted set of breakpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationTable {
    points: &'static [Breakpoint],
}

impl CalibrationTable {
    /// Create a table from breakpoints, checked at compile time
    ///
    /// Panics (a compile error in const context) if the table is empty or
    /// its inputs are not strictly increasing.
    pub const fn from_static(points: &'static [Breakpoint]) -> Self {
        assert!(!points.is_empty(), "calibration table is empty");
        let mut i = 1;
        while i < points.len() {
            assert!(
                points[i - 1].input_us < points[i].input_us,
                "calibration inputs must be strictly increasing"
            );
            i += 1;
        }
        Self { points }
    }

    /// Create a table from breakpoints, checked at runtime
    pub fn new(points: &'static [Breakpoint]) -> Result<Self, CalibrationError> {
        if points.is_empty() {
            return Err(CalibrationError::Empty);
        }
        if let Some(index) = points
            .windows(2)
            .position(|pair| pair[0].input_us >= pair[1].input_us)
        {
            return Err(CalibrationError::NotIncreasing(index + 1));
        }
        Ok(Self { points })
    }

    /// The breakpoints, in increasing input order
    pub fn points(&self) -> &'static [Breakpoint] {
        self.points
    }

    /// Evaluate the curve at `x`
    ///
    /// Inputs outside the breakpoint span clamp to the end outputs. Between
    /// breakpoints the result is linearly interpolated and truncated toward
    /// zero.
    pub fn interpolate(&self, x: u16) -> i32 {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return 0;
        };

        if x <= first.input_us {
            return first.output_us as i32;
        }
        if x >= last.input_us {
            return last.output_us as i32;
        }

        for pair in self.points.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if x <= hi.input_us {
                let (x1, y1) = (lo.input_us as f32, lo.output_us as f32);
                let (x2, y2) = (hi.input_us as f32, hi.output_us as f32);
                let y = y1 + (x as f32 - x1) * (y2 - y1) / (x2 - x1);
                return y as i32;
            }
        }

        last.output_us as i32
    }
}

const CLOSEST_POINTS: [Breakpoint; 7] = [
    Breakpoint::new(900, 882),
    Breakpoint::new(1100, 1253),
    Breakpoint::new(1300, 1512),
    Breakpoint::new(1500, 1669),
    Breakpoint::new(1700, 1768),
    Breakpoint::new(1900, 1838),
    Breakpoint::new(2100, 1883),
];

const FURTHEST_POINTS: [Breakpoint; 7] = [
    Breakpoint::new(900, 1012),
    Breakpoint::new(1100, 1378),
    Breakpoint::new(1300, 1590),
    Breakpoint::new(1500, 1696),
    Breakpoint::new(1700, 1782),
    Breakpoint::new(1900, 1851),
    Breakpoint::new(2100, 1902),
];

/// Focus position for the closest focus distance, by zoom position
pub const CLOSEST_FOCUS: CalibrationTable = CalibrationTable::from_static(&CLOSEST_POINTS);

/// Focus position for the furthest focus distance, by zoom position
pub const FURTHEST_FOCUS: CalibrationTable = CalibrationTable::from_static(&FURTHEST_POINTS);
