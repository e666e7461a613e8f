//! LC75710 vacuum fluorescent display controller
//!
//! The chip is driven over Sanyo's 3-wire CCB interface: with CE low the
//! controller's address byte is clocked in, CE goes high, and the
//! instruction word follows. Bits are sampled on the rising edge of CL and
//! sent least significant bit first. Most instructions are 24 bits wide;
//! CGRAM writes are 56 bits.
//!
//! Digits are numbered right to left, so character column 0 lives at DCRAM
//! address `DIGITS - 1`.

use dotcell_hal::{DisplayHal, HalError, Power};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::drive;

/// CCB address of the controller
pub const DEFAULT_ADDRESS: u8 = 0x67;

/// `set_extended` id that sets the display intensity
pub const INTENSITY_ID: u8 = 0xFF;

/// Intensity applied at init (0..=240)
pub const DEFAULT_INTENSITY: u8 = 128;

/// DCRAM size in characters
const DCRAM_LEN: u8 = 64;

/// Time the controller needs to execute an instruction, in microseconds
const EXEC_US: u32 = 25;

/// All grids selected
const ALL_GRIDS: u16 = 0xFFFF;

/// Display memory an instruction applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Memory {
    /// ADRAM (arbitrary dots)
    Adata = 0b01,
    /// DCRAM (character codes)
    Mdata = 0b10,
    /// Both memories
    Both = 0b11,
}

/// LC75710 VFD with `DIGITS` grids (1..=16)
pub struct Lc75710<CE, DI, CL, D, const DIGITS: usize> {
    ce: CE,
    di: DI,
    cl: CL,
    delay: D,
    address: u8,
    /// DCRAM address the next character goes to
    position: u8,
}

impl<CE, DI, CL, D, const DIGITS: usize> Lc75710<CE, DI, CL, D, DIGITS>
where
    CE: OutputPin,
    DI: OutputPin,
    CL: OutputPin,
    D: DelayNs,
{
    const VALID_DIGITS: () = assert!(
        DIGITS > 0 && DIGITS <= 16,
        "LC75710 drives 1..=16 grids"
    );

    /// Create a driver using the default CCB address
    pub fn new(ce: CE, di: DI, cl: CL, delay: D) -> Self {
        Self::with_address(ce, di, cl, delay, DEFAULT_ADDRESS)
    }

    /// Create a driver for a controller strapped to another CCB address
    pub fn with_address(ce: CE, di: DI, cl: CL, delay: D, address: u8) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_DIGITS;

        Self {
            ce,
            di,
            cl,
            delay,
            address,
            position: DIGITS as u8 - 1,
        }
    }

    /// Give back the pins and the delay
    pub fn release(self) -> (CE, DI, CL, D) {
        (self.ce, self.di, self.cl, self.delay)
    }

    /// Blink the selected digits
    ///
    /// `period` is 0..=7 (0.1 s to 1.0 s, 0 stops blinking).
    pub fn blink(&mut self, memory: Memory, period: u8, digits: u16) -> Result<(), HalError> {
        self.write(
            (0x5 << 21)
                | ((memory as u32 & 0x3) << 19)
                | ((period as u32 & 0x7) << 16)
                | digits as u32,
        )
    }

    /// Turn the selected grids on or off
    pub fn on_off(&mut self, memory: Memory, on: bool, grids: u16) -> Result<(), HalError> {
        self.write(
            (0x1 << 20) | ((memory as u32 & 0x3) << 17) | ((on as u32) << 16) | grids as u32,
        )
    }

    /// Shift the display contents by one digit
    pub fn shift(&mut self, memory: Memory, left: bool) -> Result<(), HalError> {
        self.write((0x2 << 20) | ((memory as u32 & 0x3) << 17) | ((left as u32) << 16))
    }

    /// Load the number of grids the panel has
    pub fn grid_register_load(&mut self, grids: u8) -> Result<(), HalError> {
        self.write((0x3 << 20) | ((grids as u32 & 0xF) << 16))
    }

    /// Set the address counters of DCRAM and ADRAM
    pub fn set_ac_address(&mut self, dcram: u8, adram: u8) -> Result<(), HalError> {
        self.write((0x4 << 20) | ((adram as u32 & 0xF) << 16) | ((dcram as u32 & 0x3F) << 8))
    }

    /// Set the display duty cycle (0..=240)
    pub fn intensity(&mut self, intensity: u8) -> Result<(), HalError> {
        self.write((0x5 << 20) | ((intensity as u32) << 8))
    }

    /// Store a character code in DCRAM
    pub fn dcram_write(&mut self, address: u8, chr: u8) -> Result<(), HalError> {
        self.write((0x6 << 20) | ((address as u32 & 0x3F) << 8) | chr as u32)
    }

    /// Store arbitrary dots in ADRAM
    pub fn adram_write(&mut self, address: u8, dots: u8) -> Result<(), HalError> {
        self.write((0x7 << 20) | ((address as u32 & 0xF) << 16) | ((dots as u32) << 8))
    }

    /// Store a 5x7 glyph in CGRAM
    ///
    /// `dots` holds 35 bits: five columns of seven dots, column 0 in the
    /// lowest bits.
    pub fn cgram_write(&mut self, address: u8, dots: u64) -> Result<(), HalError> {
        let word = (0x8u64 << 52) | ((address as u64) << 40) | (dots & 0x7_FFFF_FFFF);
        self.select()?;
        self.write_bits(word, 56)?;
        self.deselect()
    }

    fn write(&mut self, word: u32) -> Result<(), HalError> {
        self.select()?;
        self.write_bits(word as u64, 24)?;
        self.deselect()
    }

    fn write_bits(&mut self, value: u64, bits: u8) -> Result<(), HalError> {
        for bit in 0..bits {
            drive(&mut self.di, (value >> bit) & 0x1 != 0)?;
            drive(&mut self.cl, true)?;
            drive(&mut self.cl, false)?;
        }
        Ok(())
    }

    /// Send the address byte and open the data phase
    fn select(&mut self) -> Result<(), HalError> {
        drive(&mut self.ce, false)?;
        self.write_bits(self.address as u64, 8)?;
        drive(&mut self.ce, true)
    }

    fn deselect(&mut self) -> Result<(), HalError> {
        drive(&mut self.ce, false)?;
        self.delay.delay_us(EXEC_US);
        Ok(())
    }
}

impl<CE, DI, CL, D, const DIGITS: usize> DisplayHal for Lc75710<CE, DI, CL, D, DIGITS>
where
    CE: OutputPin,
    DI: OutputPin,
    CL: OutputPin,
    D: DelayNs,
{
    fn init(&mut self) -> Result<(), HalError> {
        drive(&mut self.cl, false)?;
        drive(&mut self.di, false)?;
        drive(&mut self.ce, false)?;

        // Registers hold garbage after power-up; the blink command with
        // everything cleared doubles as the reset function
        self.blink(Memory::Both, 0, ALL_GRIDS)?;
        for address in 0..DCRAM_LEN {
            self.dcram_write(address, b' ')?;
        }
        self.set_ac_address(0, 0)?;
        self.grid_register_load(DIGITS as u8)?;
        self.intensity(DEFAULT_INTENSITY)?;
        self.on_off(Memory::Both, true, ALL_GRIDS)
    }

    fn power(&mut self, state: Power) -> Result<(), HalError> {
        self.on_off(Memory::Both, state == Power::On, ALL_GRIDS)
    }

    fn set_cursor(&mut self, _line: u8, column: u8) -> Result<(), HalError> {
        if column as usize >= DIGITS {
            return Err(HalError::InvalidCoordinates);
        }
        self.position = DIGITS as u8 - 1 - column;
        Ok(())
    }

    fn write_char(&mut self, chr: u8) -> Result<(), HalError> {
        self.dcram_write(self.position, chr)
    }

    /// [`INTENSITY_ID`] with one byte sets the intensity; any other id
    /// stores a 5x7 glyph in CGRAM at that address from five 7-bit columns
    fn set_extended(&mut self, id: u8, data: &[u8]) -> Result<(), HalError> {
        if id == INTENSITY_ID {
            return match data {
                [intensity] => self.intensity(*intensity),
                _ => Err(HalError::BufferOverflow),
            };
        }

        if data.len() > 5 {
            return Err(HalError::BufferOverflow);
        }
        let dots = data
            .iter()
            .enumerate()
            .fold(0u64, |acc, (column, dots)| {
                acc | (((*dots & 0x7F) as u64) << (7 * column))
            });
        self.cgram_write(id, dots)
    }
}
