//! Gimbal configuration text parser
//!
//! Minimal line-oriented parser for the subset of TOML the gimbal
//! configuration uses. It does NOT support the full TOML spec.
//!
//! ```toml
//! [axis.zoom]
//! min_us = 900
//! max_us = 2100
//! slew_seconds = 2.0
//! tick_rate_hz = 50
//!
//! [validation]
//! window_min_us = 1000
//! window_max_us = 2000
//! ```
//!
//! Supported: `[section]` headers, `key = value` pairs with integer
//! values, `#` comments. `slew_seconds` also takes a decimal with up to
//! three fractional digits and is stored as whole milliseconds. Omitted
//! keys keep their defaults.

use radcam_protocol::Axis;

use super::axes::{AxisRange, ConfigError, GimbalConfig};

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Axis(Axis),
    Validation,
}

/// Parse configuration text, starting from [`GimbalConfig::default`]
///
/// The result is validated before it is returned.
pub fn parse_config(input: &str) -> Result<GimbalConfig, ConfigError> {
    let mut config = GimbalConfig::default();
    let mut section = Section::Root;
    let mut window_min: Option<u16> = None;
    let mut window_max: Option<u16> = None;

    for (index, raw) in input.lines().enumerate() {
        let line_no = (index + 1).min(u16::MAX as usize) as u16;
        let line = strip_comment(raw).trim();

        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let header = header
                .strip_suffix(']')
                .ok_or(ConfigError::InvalidSection { line: line_no })?;
            section = parse_section_header(header.trim())
                .ok_or(ConfigError::InvalidSection { line: line_no })?;
            continue;
        }

        let (key, value) = line
            .split_once('=')
            .map(|(k, v)| (k.trim(), v.trim()))
            .ok_or(ConfigError::InvalidValue { line: line_no })?;

        match section {
            Section::Root => return Err(ConfigError::UnknownKey { line: line_no }),
            Section::Axis(axis) => {
                let axis_config = config.axis_mut(axis);
                match key {
                    "min_us" => axis_config.range.min_us = parse_value(value, line_no)?,
                    "max_us" => axis_config.range.max_us = parse_value(value, line_no)?,
                    "slew_seconds" => {
                        axis_config.motion.slew_ms = parse_millis(value)
                            .ok_or(ConfigError::InvalidValue { line: line_no })?
                    }
                    "tick_rate_hz" => {
                        axis_config.motion.tick_rate_hz = parse_value(value, line_no)?
                    }
                    _ => return Err(ConfigError::UnknownKey { line: line_no }),
                }
            }
            Section::Validation => match key {
                "window_min_us" => window_min = Some(parse_value(value, line_no)?),
                "window_max_us" => window_max = Some(parse_value(value, line_no)?),
                _ => return Err(ConfigError::UnknownKey { line: line_no }),
            },
        }
    }

    config.target_window = match (window_min, window_max) {
        (Some(min_us), Some(max_us)) => Some(AxisRange::new(min_us, max_us)),
        (None, None) => None,
        _ => return Err(ConfigError::InvalidWindow),
    };

    config.validate()?;
    Ok(config)
}

/// Parse a section header like `axis.tilt` or `validation`
fn parse_section_header(header: &str) -> Option<Section> {
    if header == "validation" {
        return Some(Section::Validation);
    }
    let name = header.strip_prefix("axis.")?;
    Axis::from_name(name.trim()).map(Section::Axis)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_value<T: core::str::FromStr>(value: &str, line: u16) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue { line })
}

/// Parse decimal seconds like `2`, `2.0` or `0.35` into milliseconds
fn parse_millis(value: &str) -> Option<u32> {
    let (whole, frac) = value.split_once('.').unwrap_or((value, ""));
    if whole.is_empty() || frac.len() > 3 {
        return None;
    }
    if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut ms = whole.parse::<u32>().ok()?.checked_mul(1000)?;
    let mut scale = 100;
    for digit in frac.bytes() {
        ms = ms.checked_add((digit - b'0') as u32 * scale)?;
        scale /= 10;
    }
    Some(ms)
}
