//! HD44780 character LCD behind a 74HC595 shift register
//!
//! The LCD runs in 4-bit mode with RW tied to ground. Its control and data
//! lines hang off the parallel outputs of a shift register, so the driver
//! keeps an 8-bit virtual port and shifts the whole port out, LSB first,
//! every time a line changes:
//!
//! ```text
//! bit   7   6   5   4   3   2   1   0
//!       -   D7  D6  D5  D4  -   EN  RS
//! ```
//!
//! The controller latches a nibble on the falling edge of EN.

use dotcell_hal::{DisplayHal, HalError, Power};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::drive;

/// Register select bit of the virtual port
const RS: u8 = 0;

/// Enable strobe bit of the virtual port
const EN: u8 = 1;

/// Lowest data bit of the virtual port (D4, D5..D7 follow)
const D4: u8 = 3;

/// DDRAM start address of each display line
const LINE_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

/// Number of user-definable CGRAM glyphs
pub const CGRAM_SLOTS: u8 = 8;

/// Instruction set
mod cmd {
    pub const CLEAR_DISPLAY: u8 = 0x01;
    pub const RETURN_HOME: u8 = 0x02;
    pub const DISPLAY_CONTROL: u8 = 0x08;
    pub const FUNCTION_SET: u8 = 0x20;
    pub const SET_CGRAM_ADDR: u8 = 0x40;
    pub const SET_DDRAM_ADDR: u8 = 0x80;

    // DISPLAY_CONTROL flags
    pub const DISPLAY_ON: u8 = 0x04;
    pub const CURSOR_ON: u8 = 0x02;

    // FUNCTION_SET flags (4-bit bus and 5x8 dots are the zero values)
    pub const TWO_LINE: u8 = 0x08;
}

/// Worst-case execution time of a regular instruction, in microseconds
const EXEC_US: u32 = 50;

/// Execution time of clear and home, in milliseconds
const SLOW_EXEC_MS: u32 = 2;

/// HD44780 LCD wired through a 74HC595
///
/// `LATCH`, `CLOCK` and `DATA` are the shift register's RCLK, SRCLK and SER
/// inputs.
pub struct Hd44780<LATCH, CLOCK, DATA, D> {
    latch: LATCH,
    clock: CLOCK,
    data: DATA,
    delay: D,
    /// Shadow of the shift register outputs
    port: u8,
    /// DISPLAY_CONTROL flags currently applied
    control: u8,
    lines: u8,
}

impl<LATCH, CLOCK, DATA, D> Hd44780<LATCH, CLOCK, DATA, D>
where
    LATCH: OutputPin,
    CLOCK: OutputPin,
    DATA: OutputPin,
    D: DelayNs,
{
    /// Create a driver for a panel with `lines` character lines (1..=4)
    ///
    /// Nothing is sent until [`DisplayHal::init`].
    pub fn new(latch: LATCH, clock: CLOCK, data: DATA, delay: D, lines: u8) -> Self {
        Self {
            latch,
            clock,
            data,
            delay,
            port: 0,
            control: cmd::DISPLAY_ON,
            lines: lines.clamp(1, LINE_OFFSETS.len() as u8),
        }
    }

    /// Give back the pins and the delay
    pub fn release(self) -> (LATCH, CLOCK, DATA, D) {
        (self.latch, self.clock, self.data, self.delay)
    }

    /// Current virtual port value
    pub fn port(&self) -> u8 {
        self.port
    }

    /// Clock the virtual port into the shift register and latch it
    fn shift_out(&mut self) -> Result<(), HalError> {
        drive(&mut self.clock, false)?;
        drive(&mut self.latch, false)?;

        for bit in 0..8 {
            drive(&mut self.data, (self.port >> bit) & 0x01 != 0)?;
            drive(&mut self.clock, true)?;
            drive(&mut self.clock, false)?;
        }

        drive(&mut self.latch, true)?;
        drive(&mut self.latch, false)
    }

    fn write_nibble(&mut self, nibble: u8) -> Result<(), HalError> {
        self.port = (self.port & !(0x0F << D4)) | ((nibble & 0x0F) << D4);
        self.shift_out()?;

        self.port &= !(1 << EN);
        self.shift_out()?;
        self.port |= 1 << EN;
        self.shift_out()?;
        self.port &= !(1 << EN);
        self.shift_out()
    }

    fn transmit(&mut self, byte: u8, data: bool) -> Result<(), HalError> {
        if data {
            self.port |= 1 << RS;
        } else {
            self.port &= !(1 << RS);
        }
        self.shift_out()?;

        self.write_nibble(byte >> 4)?;
        self.write_nibble(byte)?;
        self.delay.delay_us(EXEC_US);
        Ok(())
    }

    fn command(&mut self, command: u8) -> Result<(), HalError> {
        self.transmit(command, false)
    }

    fn write_data(&mut self, data: u8) -> Result<(), HalError> {
        self.transmit(data, true)
    }

    fn apply_control(&mut self) -> Result<(), HalError> {
        self.command(cmd::DISPLAY_CONTROL | self.control)
    }
}

impl<LATCH, CLOCK, DATA, D> DisplayHal for Hd44780<LATCH, CLOCK, DATA, D>
where
    LATCH: OutputPin,
    CLOCK: OutputPin,
    DATA: OutputPin,
    D: DelayNs,
{
    fn init(&mut self) -> Result<(), HalError> {
        // Power-on wait (datasheet asks for >15 ms after Vcc reaches 4.5 V)
        self.delay.delay_ms(150);
        self.port = 0;
        self.shift_out()?;
        self.delay.delay_ms(5);

        // Reset by instruction: three times 8-bit mode, then 4-bit mode
        for _ in 0..3 {
            self.write_nibble(0x03)?;
            self.delay.delay_ms(5);
        }
        self.write_nibble(0x02)?;

        let lines = if self.lines > 1 { cmd::TWO_LINE } else { 0 };
        self.command(cmd::FUNCTION_SET | lines)?;

        self.control = cmd::DISPLAY_ON;
        self.apply_control()?;

        self.command(cmd::CLEAR_DISPLAY)?;
        self.delay.delay_ms(SLOW_EXEC_MS);
        self.command(cmd::RETURN_HOME)?;
        self.delay.delay_ms(SLOW_EXEC_MS);
        Ok(())
    }

    fn power(&mut self, state: Power) -> Result<(), HalError> {
        match state {
            Power::On => self.control |= cmd::DISPLAY_ON,
            Power::Off => self.control &= !cmd::DISPLAY_ON,
        }
        self.apply_control()
    }

    fn set_cursor(&mut self, line: u8, column: u8) -> Result<(), HalError> {
        let line = line.min(self.lines - 1) as usize;
        let address = LINE_OFFSETS[line].wrapping_add(column) & 0x7F;
        self.command(cmd::SET_DDRAM_ADDR | address)
    }

    fn write_char(&mut self, chr: u8) -> Result<(), HalError> {
        self.write_data(chr)
    }

    fn cursor_visibility(&mut self, visible: bool) -> Result<(), HalError> {
        if visible {
            self.control |= cmd::CURSOR_ON;
        } else {
            self.control &= !cmd::CURSOR_ON;
        }
        self.apply_control()
    }

    /// Program custom glyph `id` (0..8) from up to eight 5-bit pixel rows
    ///
    /// The glyph is then displayed by writing character code `id`. This
    /// moves the controller's address counter into CGRAM, so a cursor
    /// position must be set before the next character write.
    fn set_extended(&mut self, id: u8, data: &[u8]) -> Result<(), HalError> {
        if id >= CGRAM_SLOTS {
            return Err(HalError::InvalidCoordinates);
        }
        if data.len() > 8 {
            return Err(HalError::BufferOverflow);
        }

        self.command(cmd::SET_CGRAM_ADDR | (id << 3))?;
        for row in data {
            self.write_data(row & 0x1F)?;
        }
        Ok(())
    }
}
