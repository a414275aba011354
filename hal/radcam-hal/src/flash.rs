//! Flash storage abstractions
//!
//! Persistent key-value storage implemented by chip-specific HALs on top of
//! their flash memory.

use core::future::Future;

#[cfg(feature = "sequential-storage")]
use sequential_storage::map::SerializationError;

/// Storage keys for persisted data
///
/// Each key holds one record and only the latest value is kept. The
/// discriminant is the on-flash key byte and must never be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StorageKey {
    /// Last commanded axis targets (postcard format)
    AxisTargets = 0,
}

impl StorageKey {
    /// On-flash key byte
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Key for an on-flash byte, if known
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(StorageKey::AxisTargets),
            _ => None,
        }
    }
}

/// Errors from flash storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// Flash operation failed
    Flash,
    /// Storage operation failed
    Storage,
    /// Key not found
    NotFound,
    /// Buffer too small for the data
    BufferTooSmall,
}

/// Flash storage trait
///
/// Wear-leveled key-value storage. A write replaces the previous value for
/// the key; a read returns the most recent one.
pub trait FlashStorage {
    /// Read a value by key into `buffer`
    ///
    /// Returns the number of bytes read.
    fn read(
        &mut self,
        key: StorageKey,
        buffer: &mut [u8],
    ) -> impl Future<Output = Result<usize, FlashError>>;

    /// Write a value by key
    fn write(&mut self, key: StorageKey, data: &[u8]) -> impl Future<Output = Result<(), FlashError>>;

    /// Erase all stored data
    fn erase_all(&mut self) -> impl Future<Output = Result<(), FlashError>>;
}

#[cfg(feature = "sequential-storage")]
impl sequential_storage::map::Key for StorageKey {
    fn serialize_into(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
        let slot = buffer.first_mut().ok_or(SerializationError::BufferTooSmall)?;
        *slot = self.id();
        Ok(1)
    }

    fn deserialize_from(buffer: &[u8]) -> Result<(Self, usize), SerializationError> {
        let id = *buffer.first().ok_or(SerializationError::BufferTooSmall)?;
        let key = StorageKey::from_id(id).ok_or(SerializationError::InvalidFormat)?;
        Ok((key, 1))
    }
}
