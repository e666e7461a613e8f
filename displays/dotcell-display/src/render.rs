//! Render modes
//!
//! A render mode decides what the sync pass does with each dirty cell. The
//! mode is a type parameter of [`crate::Display`], so a character-only build
//! never instantiates any bitmap code.

use dotcell_hal::{Area, DisplayHal, HalError};

/// How dirty cells reach the hardware
pub trait RenderMode<H: DisplayHal> {
    /// Whether cells are committed only after [`RenderMode::finish`]
    /// succeeds, rather than one by one after [`RenderMode::draw`]
    const DEFERRED_COMMIT: bool;

    /// Called once at the start of every sync pass
    fn begin(&mut self, _hal: &mut H) -> Result<(), HalError> {
        Ok(())
    }

    /// Send or render one dirty cell
    fn draw(&mut self, hal: &mut H, line: u8, column: u8, chr: u8) -> Result<(), HalError>;

    /// Called after the walk when at least one cell was drawn
    ///
    /// `area` bounds every cell drawn in this pass.
    fn finish(&mut self, _hal: &mut H, _area: Area) -> Result<(), HalError> {
        Ok(())
    }
}

/// Character-cell rendering: position the hardware cursor, send the code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CharacterMode;

impl<H: DisplayHal> RenderMode<H> for CharacterMode {
    const DEFERRED_COMMIT: bool = false;

    fn draw(&mut self, hal: &mut H, line: u8, column: u8, chr: u8) -> Result<(), HalError> {
        hal.set_cursor(line, column)?;
        hal.write_char(chr)
    }
}
