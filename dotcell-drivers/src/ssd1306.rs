//! SSD1306 OLED over I2C
//!
//! A pixel-only backend: the panel has no character generator, so it is
//! paired with the bitmap overlay, which renders glyphs into the buffer
//! exposed by `get_buffer`. The buffer uses the controller's native
//! horizontal addressing layout, one byte per 8-pixel column slice,
//! `PAGES` rows of [`WIDTH`] bytes. Grids narrower than the panel pass
//! [`WIDTH`] as the overlay stride.

use dotcell_hal::{Area, DisplayHal, HalError, Power};
use embedded_hal::i2c::I2c;

/// Default 7-bit I2C address (SA0 low)
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Panel width in pixels
pub const WIDTH: usize = 128;

/// Contrast applied at init
pub const DEFAULT_CONTRAST: u8 = 0x8F;

/// Control byte: command bytes follow
const CONTROL_COMMAND: u8 = 0x00;

/// Control byte: display RAM data follows
const CONTROL_DATA: u8 = 0x40;

/// Command set
mod cmd {
    pub const SET_CONTRAST: u8 = 0x81;
    pub const DISPLAY_ALL_ON_RESUME: u8 = 0xA4;
    pub const NORMAL_DISPLAY: u8 = 0xA6;
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_DISPLAY_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MULTIPLEX: u8 = 0xA8;
    pub const SET_START_LINE: u8 = 0x40;
    pub const MEMORY_MODE: u8 = 0x20;
    pub const COLUMN_ADDR: u8 = 0x21;
    pub const PAGE_ADDR: u8 = 0x22;
    pub const COM_SCAN_DEC: u8 = 0xC8;
    pub const SEG_REMAP: u8 = 0xA0;
    pub const CHARGE_PUMP: u8 = 0x8D;
    pub const CHARGE_PUMP_ENABLE: u8 = 0x14;
    pub const SCROLL_DISABLE: u8 = 0x2E;
}

/// SSD1306 panel with `PAGES` 8-pixel pages (4 for 128x32, 8 for 128x64)
pub struct Ssd1306<I2C, const PAGES: usize> {
    i2c: I2C,
    address: u8,
    buffer: [[u8; WIDTH]; PAGES],
}

impl<I2C: I2c, const PAGES: usize> Ssd1306<I2C, PAGES> {
    const VALID_PAGES: () = assert!(PAGES == 4 || PAGES == 8, "SSD1306 has 4 or 8 pages");

    /// Create a driver at [`DEFAULT_ADDRESS`]
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, DEFAULT_ADDRESS)
    }

    /// Create a driver at a given 7-bit address
    pub fn with_address(i2c: I2C, address: u8) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_PAGES;

        Self {
            i2c,
            address,
            buffer: [[0; WIDTH]; PAGES],
        }
    }

    /// Give back the bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Pixel buffer, one row per page
    pub fn pages(&self) -> &[[u8; WIDTH]; PAGES] {
        &self.buffer
    }

    fn command(&mut self, command: u8) -> Result<(), HalError> {
        self.i2c
            .write(self.address, &[CONTROL_COMMAND, command])
            .map_err(|_| HalError::Communication)
    }

    fn commands(&mut self, commands: &[u8]) -> Result<(), HalError> {
        commands.iter().try_for_each(|c| self.command(*c))
    }
}

impl<I2C: I2c, const PAGES: usize> DisplayHal for Ssd1306<I2C, PAGES> {
    fn init(&mut self) -> Result<(), HalError> {
        let rows = (PAGES * 8) as u8;
        // COM pin layout: sequential for 32 rows, alternative for 64
        let com_pins = if PAGES == 4 { 0x02 } else { 0x12 };

        self.commands(&[
            cmd::DISPLAY_OFF,
            cmd::SET_DISPLAY_CLOCK_DIV,
            0x80,
            cmd::SET_MULTIPLEX,
            rows - 1,
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::CHARGE_PUMP,
            cmd::CHARGE_PUMP_ENABLE,
            cmd::MEMORY_MODE,
            0x00,
            cmd::SET_COM_PINS,
            com_pins,
            cmd::SEG_REMAP | 0x01,
            cmd::COM_SCAN_DEC,
            cmd::SET_CONTRAST,
            DEFAULT_CONTRAST,
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::DISPLAY_ALL_ON_RESUME,
            cmd::NORMAL_DISPLAY,
            cmd::SCROLL_DISABLE,
            cmd::DISPLAY_ON,
        ])
    }

    fn power(&mut self, state: Power) -> Result<(), HalError> {
        match state {
            Power::On => self.command(cmd::DISPLAY_ON),
            Power::Off => self.command(cmd::DISPLAY_OFF),
        }
    }

    fn set_cursor(&mut self, _line: u8, _column: u8) -> Result<(), HalError> {
        Err(HalError::Unsupported)
    }

    fn write_char(&mut self, _chr: u8) -> Result<(), HalError> {
        Err(HalError::Unsupported)
    }

    /// Id 0 with one byte sets the contrast
    fn set_extended(&mut self, id: u8, data: &[u8]) -> Result<(), HalError> {
        match (id, data) {
            (0, [contrast]) => self.commands(&[cmd::SET_CONTRAST, *contrast]),
            (0, _) => Err(HalError::BufferOverflow),
            _ => Err(HalError::Unsupported),
        }
    }

    fn get_buffer(&mut self) -> Option<&mut [u8]> {
        Some(self.buffer.as_flattened_mut())
    }

    /// Flush the whole frame
    ///
    /// The controller auto-increments through the page window, so the
    /// pages are streamed back to back.
    fn write_buffer(&mut self, _area: Area) -> Result<(), HalError> {
        let last_page = (PAGES - 1) as u8;
        self.commands(&[
            cmd::PAGE_ADDR,
            0,
            last_page,
            cmd::COLUMN_ADDR,
            0,
            (WIDTH - 1) as u8,
        ])?;

        let mut chunk = [0u8; WIDTH + 1];
        chunk[0] = CONTROL_DATA;
        for page in 0..PAGES {
            chunk[1..].copy_from_slice(&self.buffer[page]);
            self.i2c
                .write(self.address, &chunk)
                .map_err(|_| HalError::Communication)?;
        }
        Ok(())
    }
}
