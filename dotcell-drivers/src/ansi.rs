//! ANSI terminal backend
//!
//! Mirrors the character grid on any VT100-compatible terminal reachable
//! through an `embedded-io` writer: a UART console on target, or stdout on
//! a host. The grid is drawn one row and one column in from the terminal's
//! top-left corner, leaving room for a frame.

use core::fmt::Write as _;

use dotcell_hal::{DisplayHal, HalError, Power};
use embedded_io::Write;
use heapless::String;

const CLEAR_SCREEN: &[u8] = b"\x1b[2J";
const CURSOR_HOME: &[u8] = b"\x1b[H";
const SHOW_CURSOR: &[u8] = b"\x1b[?25h";
const HIDE_CURSOR: &[u8] = b"\x1b[?25l";

/// Terminal rows/columns between the top-left corner and cell (0, 0)
pub const ORIGIN: u16 = 1;

/// Character grid rendered with ANSI escape sequences
pub struct AnsiTerminal<W> {
    out: W,
}

impl<W: Write> AnsiTerminal<W> {
    /// Wrap a writer
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Give back the writer
    pub fn release(self) -> W {
        self.out
    }

    /// Writer access
    pub fn writer(&self) -> &W {
        &self.out
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), HalError> {
        self.out
            .write_all(bytes)
            .map_err(|_| HalError::Communication)?;
        self.out.flush().map_err(|_| HalError::Communication)
    }
}

impl<W: Write> DisplayHal for AnsiTerminal<W> {
    fn init(&mut self) -> Result<(), HalError> {
        self.out
            .write_all(CLEAR_SCREEN)
            .map_err(|_| HalError::Communication)?;
        self.send(CURSOR_HOME)
    }

    /// Terminals have no power control; the request is accepted and ignored
    fn power(&mut self, _state: Power) -> Result<(), HalError> {
        Ok(())
    }

    fn set_cursor(&mut self, line: u8, column: u8) -> Result<(), HalError> {
        // ANSI positions are 1-based
        let mut sequence: String<16> = String::new();
        write!(
            sequence,
            "\x1b[{};{}H",
            line as u16 + ORIGIN + 1,
            column as u16 + ORIGIN + 1
        )
        .map_err(|_| HalError::BufferOverflow)?;
        self.send(sequence.as_bytes())
    }

    fn write_char(&mut self, chr: u8) -> Result<(), HalError> {
        self.send(&[chr])
    }

    fn cursor_visibility(&mut self, visible: bool) -> Result<(), HalError> {
        self.send(if visible { SHOW_CURSOR } else { HIDE_CURSOR })
    }
}
