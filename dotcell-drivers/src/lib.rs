//! Display backends
//!
//! Concrete [`DisplayHal`](dotcell_hal::DisplayHal) implementations over `embedded-hal` 1.0 pins,
//! buses and delays:
//!
//! - Character LCDs (HD44780 through a 74HC595 shift register)
//! - Vacuum fluorescent displays (LC75710 over CCB)
//! - Monochrome pixel panels (SSD1306 over I2C, PCD8544 over SPI)
//! - ANSI terminals over any `embedded-io` writer
//!
//! Bus and pin errors are collapsed into `HalError::Communication`; the
//! display core keeps the affected cells dirty and retries on the next sync.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod ansi;
pub mod hd44780;
pub mod lc75710;
pub mod pcd8544;
pub mod ssd1306;

#[cfg(test)]
mod mock;

pub use ansi::AnsiTerminal;
pub use hd44780::Hd44780;
pub use lc75710::Lc75710;
pub use pcd8544::Pcd8544;
pub use ssd1306::Ssd1306;

use dotcell_hal::HalError;

use embedded_hal::digital::{OutputPin, PinState};

/// Drive an output pin, mapping its error into the HAL error space
fn drive<P: OutputPin>(pin: &mut P, high: bool) -> Result<(), HalError> {
    pin.set_state(PinState::from(high))
        .map_err(|_| HalError::Communication)
}
