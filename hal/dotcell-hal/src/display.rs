//! Display backend contract
//!
//! Defines the operations the sync engine needs from a physical display.

use crate::types::{Area, HalError, Power, SyncState};

/// Display backend trait
///
/// One implementation exists per controller chip. Backends are selected at
/// build time by type: the display core is generic over `DisplayHal`, so
/// calls are statically dispatched.
///
/// Every operation is synchronous and runs to completion. Transport and
/// timing details (shift registers, I2C/SPI framing, settling delays) are
/// the backend's own business; failures surface as [`HalError`].
pub trait DisplayHal {
    /// One-time hardware bring-up
    ///
    /// Not guaranteed to be idempotent; call exactly once.
    fn init(&mut self) -> Result<(), HalError>;

    /// Toggle panel visibility without losing content
    fn power(&mut self, state: Power) -> Result<(), HalError>;

    /// Move the physical write position
    ///
    /// - `line`: line number (0-based)
    /// - `column`: column in character cells (0-based)
    fn set_cursor(&mut self, line: u8, column: u8) -> Result<(), HalError>;

    /// Transmit one character code at the current physical position
    fn write_char(&mut self, chr: u8) -> Result<(), HalError>;

    /// Show or hide a hardware cursor indicator
    ///
    /// Controllers without one accept the call and do nothing.
    fn cursor_visibility(&mut self, _visible: bool) -> Result<(), HalError> {
        Ok(())
    }

    /// Driver-specific extension channel (registers, contrast, ...)
    ///
    /// The display core never interprets `id` or `data`.
    fn set_extended(&mut self, _id: u8, _data: &[u8]) -> Result<(), HalError> {
        Err(HalError::Unsupported)
    }

    /// Driver-specific data upload (custom glyphs)
    ///
    /// Defaults to [`DisplayHal::set_extended`].
    fn write_extended(&mut self, id: u8, data: &[u8]) -> Result<(), HalError> {
        self.set_extended(id, data)
    }

    /// Raw pixel storage of a bitmap-capable backend
    ///
    /// Returns `None` for character-only controllers.
    fn get_buffer(&mut self) -> Option<&mut [u8]> {
        None
    }

    /// Flush a region of the pixel buffer to the panel
    ///
    /// `area` is expressed in character cells. Backends may flush more than
    /// the requested region.
    fn write_buffer(&mut self, _area: Area) -> Result<(), HalError> {
        Err(HalError::Unsupported)
    }

    /// Lifecycle notification from the display core
    ///
    /// Lets a backend batch work across a pass, e.g. latch a frame or
    /// flush a transport once at [`SyncState::PeriodicEnd`]. Ignored by
    /// default.
    fn sync_state(&mut self, _state: SyncState) -> Result<(), HalError> {
        Ok(())
    }
}

impl<T: DisplayHal + ?Sized> DisplayHal for &mut T {
    fn init(&mut self) -> Result<(), HalError> {
        (**self).init()
    }

    fn power(&mut self, state: Power) -> Result<(), HalError> {
        (**self).power(state)
    }

    fn set_cursor(&mut self, line: u8, column: u8) -> Result<(), HalError> {
        (**self).set_cursor(line, column)
    }

    fn write_char(&mut self, chr: u8) -> Result<(), HalError> {
        (**self).write_char(chr)
    }

    fn cursor_visibility(&mut self, visible: bool) -> Result<(), HalError> {
        (**self).cursor_visibility(visible)
    }

    fn set_extended(&mut self, id: u8, data: &[u8]) -> Result<(), HalError> {
        (**self).set_extended(id, data)
    }

    fn write_extended(&mut self, id: u8, data: &[u8]) -> Result<(), HalError> {
        (**self).write_extended(id, data)
    }

    fn get_buffer(&mut self) -> Option<&mut [u8]> {
        (**self).get_buffer()
    }

    fn write_buffer(&mut self, area: Area) -> Result<(), HalError> {
        (**self).write_buffer(area)
    }

    fn sync_state(&mut self, state: SyncState) -> Result<(), HalError> {
        (**self).sync_state(state)
    }
}
