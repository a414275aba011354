//! Persisted axis targets
//!
//! The last commanded target for every axis, saved to flash after each
//! update and restored at boot.

use serde::{Deserialize, Serialize};

use radcam_protocol::Axis;

use super::axes::DEFAULT_TARGET_US;

/// Magic number to identify a valid target record
pub const TARGETS_MAGIC: u32 = 0x5243_5447; // "RCTG"

/// Current target record version
pub const TARGETS_VERSION: u8 = 1;

/// Upper bound on the encoded record size
pub const MAX_TARGETS_SIZE: usize = 32;

/// Target record encoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TargetsError {
    /// Serialization failed (buffer too small)
    Serialize,
    /// Deserialization failed
    Deserialize,
    /// Invalid magic or version
    InvalidFormat,
    /// CRC check failed
    CrcMismatch,
}

/// Axis targets as stored in flash
///
/// This struct is serialized to flash using postcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisTargets {
    /// Magic number for validation
    pub magic: u32,
    /// Data format version
    pub version: u8,
    /// Target per axis in microseconds, indexed by [`Axis::index`]
    pub targets: [u16; Axis::COUNT],
    /// CRC32 checksum (calculated over magic..targets)
    pub crc: u32,
}

impl Default for AxisTargets {
    fn default() -> Self {
        Self::new()
    }
}

impl AxisTargets {
    /// Create a record with every axis at [`DEFAULT_TARGET_US`]
    pub const fn new() -> Self {
        Self::uniform(DEFAULT_TARGET_US)
    }

    /// Create a record with every axis at the same target
    pub const fn uniform(us: u16) -> Self {
        Self {
            magic: TARGETS_MAGIC,
            version: TARGETS_VERSION,
            targets: [us; Axis::COUNT],
            crc: 0,
        }
    }

    /// Get the target for an axis
    pub fn get(&self, axis: Axis) -> u16 {
        self.targets[axis.index()]
    }

    /// Set the target for an axis
    pub fn set(&mut self, axis: Axis, us: u16) {
        self.targets[axis.index()] = us;
    }

    /// Check if magic and version match
    pub fn is_valid(&self) -> bool {
        self.magic == TARGETS_MAGIC && self.version == TARGETS_VERSION
    }

    /// Calculate CRC32 over the record (excluding the crc field itself)
    pub fn calculate_crc(&self) -> u32 {
        let mut crc: u32 = 0xFFFF_FFFF;
        crc = crc32_update(crc, &self.magic.to_le_bytes());
        crc = crc32_update(crc, &[self.version]);
        for target in &self.targets {
            crc = crc32_update(crc, &target.to_le_bytes());
        }
        !crc
    }

    /// Update the CRC field
    pub fn update_crc(&mut self) {
        self.crc = self.calculate_crc();
    }

    /// Verify the CRC is correct
    pub fn verify_crc(&self) -> bool {
        self.crc == self.calculate_crc()
    }

    /// Encode into `buffer` with a fresh CRC
    ///
    /// Returns the used prefix of `buffer`.
    pub fn encode<'b>(&self, buffer: &'b mut [u8]) -> Result<&'b mut [u8], TargetsError> {
        let mut sealed = *self;
        sealed.update_crc();
        postcard::to_slice(&sealed, buffer).map_err(|_| TargetsError::Serialize)
    }

    /// Decode and validate a stored record
    pub fn decode(bytes: &[u8]) -> Result<Self, TargetsError> {
        let record: AxisTargets =
            postcard::from_bytes(bytes).map_err(|_| TargetsError::Deserialize)?;

        if !record.is_valid() {
            return Err(TargetsError::InvalidFormat);
        }
        if !record.verify_crc() {
            return Err(TargetsError::CrcMismatch);
        }
        Ok(record)
    }
}

/// Simple CRC32 update function (IEEE 802.3 polynomial)
fn crc32_update(crc: u32, data: &[u8]) -> u32 {
    const POLY: u32 = 0xEDB8_8320;
    let mut crc = crc;

    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLY;
            } else {
                crc >>= 1;
            }
        }
    }

    crc
}
