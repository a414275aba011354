//! CH9120 serial-to-Ethernet bridge
//!
//! The CH9120 relays a TCP socket onto a UART. Two control lines select its
//! mode:
//!
//! - `CFG` low: the UART talks to the chip's command interpreter
//! - `CFG` high: the UART is transparently bridged to the socket
//! - `RST` low holds the chip in reset
//!
//! Network parameters live in the chip's own EEPROM, so at boot the
//! firmware only has to make sure the chip leaves configuration mode with
//! its stored settings applied.
//!
//! # Command frame
//!
//! Every command is `0x57 0xAB <code> [payload]`:
//! - `0x0D`: save parameters to EEPROM
//! - `0x0E`: apply parameters and reset the network stack
//! - `0x5E`: leave serial configuration mode

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_io_async::Write;

/// Command frame header
pub const COMMAND_HEADER: [u8; 2] = [0x57, 0xAB];

/// Command codes
pub mod cmd {
    /// Save parameters to EEPROM
    pub const SAVE_PARAMS: u8 = 0x0D;
    /// Apply parameters and reset
    pub const APPLY_AND_RESET: u8 = 0x0E;
    /// Leave configuration mode
    pub const EXIT_CONFIG: u8 = 0x5E;
}

/// Sequence sent to leave configuration mode with stored settings
const EXIT_SEQUENCE: [u8; 3] = [cmd::SAVE_PARAMS, cmd::APPLY_AND_RESET, cmd::EXIT_CONFIG];

/// Bridge errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeError {
    /// A control line could not be driven
    Pin,
    /// The command could not be written to the UART
    Serial,
}

/// Bring-up delays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BridgeTiming {
    /// Wait after entering configuration mode (ms)
    pub enter_settle_ms: u32,
    /// Wait after each command (ms)
    pub command_gap_ms: u32,
    /// Wait after returning to transparent mode (ms)
    pub exit_settle_ms: u32,
}

impl Default for BridgeTiming {
    fn default() -> Self {
        Self {
            enter_settle_ms: 500,
            command_gap_ms: 100,
            exit_settle_ms: 100,
        }
    }
}

/// CH9120 mode control
pub struct Ch9120<CFG, RST> {
    cfg: CFG,
    rst: RST,
    timing: BridgeTiming,
}

impl<CFG: OutputPin, RST: OutputPin> Ch9120<CFG, RST> {
    /// Create a driver with default timing
    pub fn new(cfg: CFG, rst: RST) -> Self {
        Self::with_timing(cfg, rst, BridgeTiming::default())
    }

    /// Create a driver with custom timing
    pub fn with_timing(cfg: CFG, rst: RST, timing: BridgeTiming) -> Self {
        Self { cfg, rst, timing }
    }

    /// Release the chip from reset and select configuration mode
    pub async fn enter_config<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), BridgeError> {
        self.rst.set_high().map_err(|_| BridgeError::Pin)?;
        self.cfg.set_low().map_err(|_| BridgeError::Pin)?;
        delay.delay_ms(self.timing.enter_settle_ms).await;
        Ok(())
    }

    /// Send one command frame
    pub async fn send_command<W: Write, D: DelayNs>(
        &mut self,
        uart: &mut W,
        delay: &mut D,
        code: u8,
    ) -> Result<(), BridgeError> {
        let frame = [COMMAND_HEADER[0], COMMAND_HEADER[1], code];
        uart.write_all(&frame)
            .await
            .map_err(|_| BridgeError::Serial)?;
        uart.flush().await.map_err(|_| BridgeError::Serial)?;
        delay.delay_ms(self.timing.command_gap_ms).await;
        Ok(())
    }

    /// Apply stored settings and switch to transparent mode
    pub async fn exit_config<W: Write, D: DelayNs>(
        &mut self,
        uart: &mut W,
        delay: &mut D,
    ) -> Result<(), BridgeError> {
        for code in EXIT_SEQUENCE {
            self.send_command(uart, delay, code).await?;
        }
        self.cfg.set_high().map_err(|_| BridgeError::Pin)?;
        delay.delay_ms(self.timing.exit_settle_ms).await;
        Ok(())
    }

    /// Full boot sequence: enter configuration, then leave it
    pub async fn start_transparent<W: Write, D: DelayNs>(
        &mut self,
        uart: &mut W,
        delay: &mut D,
    ) -> Result<(), BridgeError> {
        self.enter_config(delay).await?;
        self.exit_config(uart, delay).await
    }
}
