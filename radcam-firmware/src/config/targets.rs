//! Axis target persistence
//!
//! Loads and saves the last commanded targets to flash storage.

use defmt::*;

use radcam_core::config::{AxisTargets, TargetsError, MAX_TARGETS_SIZE};
use radcam_core::Axis;
use radcam_hal::{FlashError, FlashStorage, StorageKey};

/// Target persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PersistError {
    /// Flash operation failed
    Flash(FlashError),
    /// Record could not be encoded or decoded
    Record(TargetsError),
}

impl From<FlashError> for PersistError {
    fn from(e: FlashError) -> Self {
        PersistError::Flash(e)
    }
}

impl From<TargetsError> for PersistError {
    fn from(e: TargetsError) -> Self {
        PersistError::Record(e)
    }
}

/// Load the stored targets
///
/// Returns every axis at the default target if nothing is stored or the
/// stored record is invalid. A storage region the map cannot read is
/// erased so that later saves can succeed.
pub async fn load_targets<F: FlashStorage>(storage: &mut F) -> AxisTargets {
    match load_targets_inner(storage).await {
        Ok(targets) => {
            info!("Restored axis targets from flash");
            log_targets(&targets);
            targets
        }
        Err(PersistError::Flash(FlashError::NotFound)) => {
            info!("No stored targets, using defaults");
            AxisTargets::new()
        }
        Err(PersistError::Flash(FlashError::Storage)) => {
            error!("Target storage unreadable, erasing");
            if let Err(e) = storage.erase_all().await {
                error!("Failed to erase target storage: {:?}", e);
            }
            AxisTargets::new()
        }
        Err(e) => {
            warn!("Failed to load targets: {:?}, using defaults", e);
            AxisTargets::new()
        }
    }
}

async fn load_targets_inner<F: FlashStorage>(storage: &mut F) -> Result<AxisTargets, PersistError> {
    let mut buffer = [0u8; MAX_TARGETS_SIZE];
    let len = storage.read(StorageKey::AxisTargets, &mut buffer).await?;
    trace!("Read {} bytes of targets from flash", len);
    Ok(AxisTargets::decode(&buffer[..len])?)
}

/// Save targets to flash
pub async fn save_targets<F: FlashStorage>(
    storage: &mut F,
    targets: &AxisTargets,
) -> Result<(), PersistError> {
    let mut buffer = [0u8; MAX_TARGETS_SIZE];
    let bytes = targets.encode(&mut buffer)?;

    storage.write(StorageKey::AxisTargets, bytes).await?;

    debug!("Saved axis targets to flash");
    log_targets(targets);
    Ok(())
}

fn log_targets(targets: &AxisTargets) {
    for axis in Axis::ALL {
        trace!("  {=str} = {} us", axis.name(), targets.get(axis));
    }
}
