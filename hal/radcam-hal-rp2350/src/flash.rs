//! Flash storage driver for RP2350
//!
//! A sequential-storage map over the last 64 KiB of the 4 MiB flash on the
//! RP2350-ETH. The firmware image must stay below this region (see
//! `memory.x`).

use core::ops::Range;

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use embedded_storage_async::nor_flash::NorFlash;
use radcam_hal::{FlashError, FlashStorage, StorageKey};
use sequential_storage::cache::NoCache;
use sequential_storage::map;

/// Total flash on the board
pub const FLASH_SIZE: usize = 4 * 1024 * 1024;

/// Size of the storage region at the end of flash
pub const STORAGE_SIZE: usize = 64 * 1024;

/// Byte range handed to sequential-storage
pub const STORAGE_RANGE: Range<u32> = (FLASH_SIZE - STORAGE_SIZE) as u32..FLASH_SIZE as u32;

const _: () = assert!(STORAGE_SIZE % ERASE_SIZE == 0);
const _: () = assert!((FLASH_SIZE - STORAGE_SIZE) % ERASE_SIZE == 0);

/// Map scratch space; stored items are a few dozen bytes
const SCRATCH_SIZE: usize = 128;

/// Persistent key-value storage on the RP2350 flash
pub struct Rp2350FlashStorage<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
}

impl<'d> Rp2350FlashStorage<'d> {
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
        }
    }

    /// Look up `key`, copying the value into `out`
    ///
    /// `Ok(None)` means the key has never been written.
    async fn fetch(
        &mut self,
        key: StorageKey,
        out: &mut [u8],
    ) -> Result<Option<usize>, FlashError> {
        let mut scratch = [0u8; SCRATCH_SIZE];
        let item = map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            STORAGE_RANGE,
            &mut NoCache::new(),
            &mut scratch,
            &key,
        )
        .await
        .map_err(|_| FlashError::Storage)?;

        let Some(data) = item else {
            return Ok(None);
        };
        out.get_mut(..data.len())
            .ok_or(FlashError::BufferTooSmall)?
            .copy_from_slice(data);
        Ok(Some(data.len()))
    }
}

impl FlashStorage for Rp2350FlashStorage<'_> {
    async fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        self.fetch(key, buffer).await?.ok_or(FlashError::NotFound)
    }

    async fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
        let mut scratch = [0u8; SCRATCH_SIZE];
        map::store_item(
            &mut self.flash,
            STORAGE_RANGE,
            &mut NoCache::new(),
            &mut scratch,
            &key,
            &data,
        )
        .await
        .map_err(|_| FlashError::Storage)
    }

    async fn erase_all(&mut self) -> Result<(), FlashError> {
        self.flash
            .erase(STORAGE_RANGE.start, STORAGE_RANGE.end)
            .await
            .map_err(|_| FlashError::Flash)
    }
}
