//! Build script for radcam-firmware
//!
//! - Sets up linker search paths and scripts for memory.x
//! - Validates gimbal.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Axis sections the firmware understands
const AXES: [&str; 4] = ["tilt", "zoom", "focus", "yaw"];

/// Keys allowed in an axis section
const AXIS_KEYS: [&str; 4] = ["min_us", "max_us", "slew_seconds", "tick_rate_hz"];

/// Keys allowed in the validation section
const VALIDATION_KEYS: [&str; 2] = ["window_min_us", "window_max_us"];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate gimbal.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=gimbal.toml");

    let config_path = Path::new("gimbal.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: gimbal.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds gimbal.toml as its axis configuration.      ║\n\
            ║  Please create one in the radcam-firmware directory.             ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read gimbal.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in gimbal.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_axes(&config, &mut errors);
    validate_window(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid gimbal configuration                             ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=gimbal.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Only `[axis.*]` and `[validation]` may appear at the top level
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };

    for (name, value) in root {
        match name.as_str() {
            "axis" | "validation" if value.is_table() => {}
            "axis" | "validation" => errors.push(format!("[{}] must be a table", name)),
            _ => errors.push(format!("unknown top-level key '{}'", name)),
        }
    }
}

/// Validate each `[axis.<name>]` section
fn validate_axes(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(axes) = config.get("axis").and_then(|a| a.as_table()) else {
        return;
    };

    for (name, axis) in axes {
        if !AXES.contains(&name.as_str()) {
            errors.push(format!("[axis.{}] is not one of tilt/zoom/focus/yaw", name));
            continue;
        }
        let Some(axis) = axis.as_table() else {
            errors.push(format!("[axis.{}] must be a table", name));
            continue;
        };

        for key in axis.keys() {
            if !AXIS_KEYS.contains(&key.as_str()) {
                errors.push(format!("[axis.{}] unknown key '{}'", name, key));
            }
        }

        let min_us = pulse_width(axis.get("min_us"), &format!("axis.{}", name), "min_us", errors);
        let max_us = pulse_width(axis.get("max_us"), &format!("axis.{}", name), "max_us", errors);
        if let (Some(min), Some(max)) = (min_us, max_us) {
            if min > max {
                errors.push(format!("[axis.{}] min_us must not exceed max_us", name));
            }
        }

        match axis.get("slew_seconds") {
            None => {}
            Some(toml::Value::Float(s)) if *s > 0.0 && is_whole_millis(*s) => {}
            Some(toml::Value::Integer(s)) if *s > 0 => {}
            Some(_) => errors.push(format!(
                "[axis.{}] slew_seconds must be positive, in whole ms",
                name
            )),
        }

        match axis.get("tick_rate_hz") {
            None => {}
            Some(toml::Value::Integer(hz)) if (1..=1000).contains(hz) => {}
            Some(_) => errors.push(format!("[axis.{}] tick_rate_hz must be 1-1000", name)),
        }
    }
}

/// Validate the optional `[validation]` window
fn validate_window(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(window) = config.get("validation").and_then(|v| v.as_table()) else {
        return;
    };

    for key in window.keys() {
        if !VALIDATION_KEYS.contains(&key.as_str()) {
            errors.push(format!("[validation] unknown key '{}'", key));
        }
    }

    let min_us = pulse_width(window.get("window_min_us"), "validation", "window_min_us", errors);
    let max_us = pulse_width(window.get("window_max_us"), "validation", "window_max_us", errors);
    match (min_us, max_us) {
        (Some(min), Some(max)) if min > max => {
            errors.push("[validation] window_min_us must not exceed window_max_us".to_string())
        }
        (Some(_), None) | (None, Some(_)) => errors.push(
            "[validation] window_min_us and window_max_us must be set together".to_string(),
        ),
        _ => {}
    }
}

/// Runtime parser keeps at most three decimal places
fn is_whole_millis(seconds: f64) -> bool {
    let ms = seconds * 1000.0;
    (ms - ms.round()).abs() < 1e-6
}

/// Check an optional pulse-width value fits in 0-65535 µs
fn pulse_width(
    value: Option<&toml::Value>,
    section: &str,
    key: &str,
    errors: &mut Vec<String>,
) -> Option<i64> {
    match value? {
        toml::Value::Integer(us) if (0..=i64::from(u16::MAX)).contains(us) => Some(*us),
        _ => {
            errors.push(format!("[{}] {} must be an integer 0-65535", section, key));
            None
        }
    }
}
