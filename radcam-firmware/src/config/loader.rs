//! Embedded configuration
//!
//! gimbal.toml is compiled into the firmware and validated by the build
//! script; it is parsed once at boot.

use defmt::*;

use radcam_core::config::{parse_config, GimbalConfig};
use radcam_core::Axis;

/// Embedded configuration (compiled into firmware)
/// Edit gimbal.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../../gimbal.toml");

/// Parse the embedded configuration
///
/// Falls back to built-in defaults if the text does not parse, which can
/// only happen if the build-time and runtime parsers disagree.
pub fn load_config() -> GimbalConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using default configuration");
            GimbalConfig::default()
        }
    };

    log_config_summary(&config);
    config
}

fn log_config_summary(config: &GimbalConfig) {
    for axis in Axis::ALL {
        let cfg = config.axis(axis);
        debug!(
            "  {=str}: {}-{} us, {} ms full sweep at {} Hz",
            axis.name(),
            cfg.range.min_us,
            cfg.range.max_us,
            cfg.motion.slew_ms,
            cfg.motion.tick_rate_hz
        );
    }
    match config.target_window {
        Some(window) => info!(
            "Target window: {}-{} us",
            window.min_us, window.max_us
        ),
        None => debug!("Target window disabled"),
    }
}
