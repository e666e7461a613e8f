//! PCD8544 (Nokia 5110/3310) LCD over SPI
//!
//! 84x48 pixels in six 8-pixel banks. Like the SSD1306 this is a
//! pixel-only backend for the bitmap overlay. The D/C line selects
//! between command (low) and display data (high); chip select is owned by
//! the `SpiDevice`.

use dotcell_hal::{Area, DisplayHal, HalError, Power};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::drive;

/// Panel width in pixels
pub const WIDTH: usize = 84;

/// Number of 8-pixel banks
pub const BANKS: usize = 6;

/// Operating voltage applied at init (Vop, 0..=0x7F)
pub const DEFAULT_VOP: u8 = 0x3F;

/// Reset pulse width, in milliseconds
const RESET_MS: u32 = 100;

/// Instruction set
mod cmd {
    /// Basic instruction set, chip active, horizontal addressing
    pub const FUNCTION_SET: u8 = 0x20;
    /// FUNCTION_SET flag: extended instruction set
    pub const EXTENDED: u8 = 0x01;
    /// FUNCTION_SET flag: power down
    pub const POWER_DOWN: u8 = 0x04;
    pub const DISPLAY_NORMAL: u8 = 0x0C;
    pub const SET_Y: u8 = 0x40;
    pub const SET_X: u8 = 0x80;

    // Extended instruction set
    pub const TEMP_COEFF: u8 = 0x04;
    pub const BIAS: u8 = 0x10;
    pub const SET_VOP: u8 = 0x80;
}

/// PCD8544 LCD
pub struct Pcd8544<SPI, DC, RST, D> {
    spi: SPI,
    dc: DC,
    rst: RST,
    delay: D,
    buffer: [[u8; WIDTH]; BANKS],
}

impl<SPI, DC, RST, D> Pcd8544<SPI, DC, RST, D>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    D: DelayNs,
{
    /// Create a driver; nothing is sent until [`DisplayHal::init`]
    pub fn new(spi: SPI, dc: DC, rst: RST, delay: D) -> Self {
        Self {
            spi,
            dc,
            rst,
            delay,
            buffer: [[0; WIDTH]; BANKS],
        }
    }

    /// Give back the bus, pins and delay
    pub fn release(self) -> (SPI, DC, RST, D) {
        (self.spi, self.dc, self.rst, self.delay)
    }

    /// Pixel buffer, one row per bank
    pub fn banks(&self) -> &[[u8; WIDTH]; BANKS] {
        &self.buffer
    }

    fn command(&mut self, command: u8) -> Result<(), HalError> {
        drive(&mut self.dc, false)?;
        self.spi
            .write(&[command])
            .map_err(|_| HalError::Communication)
    }

    fn commands(&mut self, commands: &[u8]) -> Result<(), HalError> {
        commands.iter().try_for_each(|c| self.command(*c))
    }

    /// Set the operating voltage (contrast)
    pub fn set_vop(&mut self, vop: u8) -> Result<(), HalError> {
        self.commands(&[
            cmd::FUNCTION_SET | cmd::EXTENDED,
            cmd::SET_VOP | (vop & 0x7F),
            cmd::FUNCTION_SET,
        ])
    }
}

impl<SPI, DC, RST, D> DisplayHal for Pcd8544<SPI, DC, RST, D>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    D: DelayNs,
{
    fn init(&mut self) -> Result<(), HalError> {
        drive(&mut self.rst, true)?;
        drive(&mut self.rst, false)?;
        self.delay.delay_ms(RESET_MS);
        drive(&mut self.rst, true)?;

        self.commands(&[
            cmd::FUNCTION_SET | cmd::EXTENDED,
            cmd::SET_VOP | DEFAULT_VOP,
            cmd::TEMP_COEFF,
            // Bias 1:48
            cmd::BIAS | 0x04,
            cmd::FUNCTION_SET,
            cmd::DISPLAY_NORMAL,
        ])
    }

    fn power(&mut self, state: Power) -> Result<(), HalError> {
        match state {
            Power::On => self.commands(&[cmd::FUNCTION_SET, cmd::DISPLAY_NORMAL]),
            Power::Off => self.command(cmd::FUNCTION_SET | cmd::POWER_DOWN),
        }
    }

    fn set_cursor(&mut self, _line: u8, _column: u8) -> Result<(), HalError> {
        Err(HalError::Unsupported)
    }

    fn write_char(&mut self, _chr: u8) -> Result<(), HalError> {
        Err(HalError::Unsupported)
    }

    /// Id 0 with one byte sets Vop
    fn set_extended(&mut self, id: u8, data: &[u8]) -> Result<(), HalError> {
        match (id, data) {
            (0, [vop]) => self.set_vop(*vop),
            (0, _) => Err(HalError::BufferOverflow),
            _ => Err(HalError::Unsupported),
        }
    }

    fn get_buffer(&mut self) -> Option<&mut [u8]> {
        Some(self.buffer.as_flattened_mut())
    }

    /// Home the address counters and stream the whole frame
    fn write_buffer(&mut self, _area: Area) -> Result<(), HalError> {
        self.commands(&[cmd::SET_X, cmd::SET_Y])?;
        drive(&mut self.dc, true)?;
        self.spi
            .write(self.buffer.as_flattened())
            .map_err(|_| HalError::Communication)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{self, Delay, Event, Log, Pin, SpiBus};

    type Lcd = Pcd8544<SpiBus, Pin, Pin, Delay>;

    fn lcd() -> (Lcd, Log) {
        let log = mock::log();
        let lcd = Pcd8544::new(
            SpiBus::new(&log),
            Pin::new("dc", &log),
            Pin::new("rst", &log),
            Delay::new(&log),
        );
        (lcd, log)
    }

    /// SPI transfers tagged with the D/C level they were sent under
    fn transfers(log: &Log) -> Vec<(bool, Vec<u8>)> {
        let mut dc = false;
        let mut sent = Vec::new();
        for event in log.borrow().iter() {
            match event {
                Event::Pin("dc", high) => dc = *high,
                Event::Spi(bytes) => sent.push((dc, bytes.clone())),
                _ => {}
            }
        }
        sent
    }

    fn commands(log: &Log) -> Vec<u8> {
        transfers(log)
            .into_iter()
            .filter(|(dc, _)| !dc)
            .flat_map(|(_, bytes)| bytes)
            .collect()
    }

    #[test]
    fn test_reset_then_init_commands() {
        let (mut lcd, log) = lcd();
        lcd.init().unwrap();

        let events = log.borrow().clone();
        assert_eq!(
            &events[..2],
            &[Event::Pin("rst", true), Event::Pin("rst", false)]
        );
        let released = events
            .iter()
            .rposition(|event| *event == Event::Pin("rst", true))
            .unwrap();
        assert!(mock::total_delay_ns(&events[..released]) >= 100_000_000);
        assert_eq!(commands(&log), vec![0x21, 0xBF, 0x04, 0x14, 0x20, 0x0C]);
    }

    #[test]
    fn test_flush_streams_frame_as_data() {
        let (mut lcd, log) = lcd();

        let buffer = lcd.get_buffer().unwrap();
        assert_eq!(buffer.len(), 504);
        buffer[WIDTH] = 0xFF;

        lcd.write_buffer(Area::full(6, 14)).unwrap();

        let sent = transfers(&log);
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0], (false, vec![0x80]));
        assert_eq!(sent[1], (false, vec![0x40]));
        let (dc, frame) = &sent[2];
        assert!(*dc);
        assert_eq!(frame.len(), WIDTH * BANKS);
        assert_eq!(frame[WIDTH], 0xFF);
        assert_eq!(lcd.banks()[1][0], 0xFF);
    }

    #[test]
    fn test_power_down_and_up() {
        let (mut lcd, log) = lcd();

        lcd.power(Power::Off).unwrap();
        lcd.power(Power::On).unwrap();

        assert_eq!(commands(&log), vec![0x24, 0x20, 0x0C]);
    }

    #[test]
    fn test_extended_vop() {
        let (mut lcd, log) = lcd();

        lcd.set_extended(0, &[0xC5]).unwrap();
        assert_eq!(commands(&log), vec![0x21, 0x80 | 0x45, 0x20]);

        assert_eq!(lcd.set_extended(0, &[]), Err(HalError::BufferOverflow));
        assert_eq!(lcd.set_extended(3, &[1]), Err(HalError::Unsupported));
    }

    #[test]
    fn test_bus_error() {
        let (mut lcd, _log) = lcd();
        lcd.spi.fail = true;

        assert_eq!(
            lcd.write_buffer(Area::cell(0, 0)),
            Err(HalError::Communication)
        );
    }

    #[test]
    fn test_bitmap_display_sync() {
        use dotcell_display::{BitmapDisplay, CellSize, Font5x8};

        let (lcd, log) = lcd();
        // 14 six-pixel columns fill the 84-pixel rows exactly
        let mut display: BitmapDisplay<Lcd, Font5x8, 6, 14> =
            BitmapDisplay::with_bitmap(lcd, Font5x8, CellSize::CELL_6X8);
        display.set_cursor(5, 13);
        display.write_char(b'-');

        display.sync().unwrap();
        let sent = transfers(&log);
        let (_, frame) = sent.last().unwrap();
        let offset = 13 * 6 + 5 * WIDTH;
        assert_eq!(&frame[offset..offset + 6], &[0x08, 0x08, 0x08, 0x08, 0x08, 0x00]);

        // A failed flush leaves everything to resend
        display.write_char(b'x');
        display.hal_mut().spi.fail = true;
        assert_eq!(display.sync(), Err(HalError::Communication));
        assert_eq!(display.dirty_count(), 1);

        display.hal_mut().spi.fail = false;
        log.borrow_mut().clear();
        display.sync().unwrap();
        assert_eq!(display.dirty_count(), 0);
        assert_eq!(transfers(&log).len(), 3);
    }
}
