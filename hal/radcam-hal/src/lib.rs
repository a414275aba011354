//! RadCam Hardware Abstraction Layer
//!
//! Traits implemented by chip-specific HALs so that application code can
//! stay independent of the microcontroller.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (radcam-firmware)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  radcam-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  radcam-hal-  │
//!             │    rp2350     │
//!             └───────────────┘
//! ```
//!
//! Servo output lives in `radcam-core` as it is driven by the motion logic;
//! this crate only covers persistent storage.

#![no_std]
#![deny(unsafe_code)]

pub mod flash;

pub use flash::{FlashError, FlashStorage, StorageKey};
