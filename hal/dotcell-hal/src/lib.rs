//! dotcell Hardware Abstraction Layer
//!
//! This crate defines the capability contract every physical display
//! backend implements. The display core (`dotcell-display`) is the only
//! consumer: applications never call the HAL directly, they mutate the
//! screen buffer and let the sync pass drive the hardware.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application                            │
//! └─────────────────────────────────────────┘
//!                     │ write / clear / sync
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  dotcell-display (buffer + sync engine) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  dotcell-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!     ┌───────────┬───┴───────┬───────────┐
//!     ▼           ▼           ▼           ▼
//! ┌────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐
//! │HD44780 │ │ LC75710 │ │ SSD1306 │ │ PCD8544 │
//! └────────┘ └─────────┘ └─────────┘ └─────────┘
//! ```
//!
//! Backends come in two families: character-cell controllers that take a
//! cursor position and a character code, and pixel-addressable panels that
//! expose a raw pixel buffer through [`DisplayHal::get_buffer`] and flush it
//! with [`DisplayHal::write_buffer`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
pub mod types;

// Re-export key types at crate root for convenience
pub use display::DisplayHal;
pub use types::{Area, HalError, Power, SyncState};
