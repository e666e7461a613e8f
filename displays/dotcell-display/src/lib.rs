//! Display buffering and synchronization core for dotcell
//!
//! This crate provides:
//! - [`Cell`] and [`ScreenBuffer`]: the in-memory screen model, one cell per
//!   character position holding what the application wrote and what the
//!   panel last received
//! - [`Cursor`]: saturating (line, column) addressing over the buffer
//! - [`Display`]: the application-facing context (write char/string/number,
//!   clear, cursor control) and the sync pass that pushes only dirty cells
//!   through a [`DisplayHal`]
//! - Bitmap overlay (feature `bitmap`): glyph rendering into the pixel
//!   buffer of pixel-addressable backends
//! - [`SharedDisplay`]: mutual exclusion for targets that touch the display
//!   from interrupts or several tasks
//!
//! # Architecture
//!
//! Writes only touch the screen buffer. A separate periodic call to
//! [`Display::sync`] walks the buffer in row-major order and is the sole
//! caller into the HAL:
//!
//! ```text
//! write_*/clear ──▶ ScreenBuffer ──sync──▶ RenderMode ──▶ DisplayHal
//!                                            │
//!                                            ├─ CharacterMode: set_cursor + write_char
//!                                            └─ BitmapMode:    glyph blit + write_buffer
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
#[macro_use]
mod fmt;

pub mod cell;
pub mod cursor;
pub mod display;
pub mod render;
pub mod screen;
pub mod shared;

#[cfg(feature = "bitmap")]
pub mod font;
#[cfg(feature = "bitmap")]
pub mod overlay;

#[cfg(test)]
mod mock;

// Re-export key types
pub use cell::Cell;
pub use cursor::Cursor;
pub use display::{CharDisplay, Display, SyncReport};
pub use render::{CharacterMode, RenderMode};
pub use screen::{ScreenBuffer, ALL_LINES};
pub use shared::SharedDisplay;

#[cfg(feature = "bitmap")]
pub use display::BitmapDisplay;
#[cfg(feature = "bitmap")]
pub use font::{Font, Font5x8};
#[cfg(feature = "bitmap")]
pub use overlay::{BitmapMode, CellSize, Geometry};

pub use dotcell_hal::{Area, DisplayHal, HalError, Power, SyncState};
