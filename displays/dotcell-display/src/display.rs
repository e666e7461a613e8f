//! Display context
//!
//! [`Display`] owns the HAL, the screen buffer and the cursor. Application
//! writes only touch the buffer; [`Display::sync`] is the single place that
//! talks to the hardware.

use dotcell_hal::{Area, DisplayHal, HalError, Power, SyncState};

use crate::cursor::{position_of, Cursor};
use crate::render::{CharacterMode, RenderMode};
use crate::screen::ScreenBuffer;
use crate::Cell;

#[cfg(feature = "bitmap")]
use crate::font::Font;
#[cfg(feature = "bitmap")]
use crate::overlay::{BitmapMode, CellSize, Geometry};

/// Place values walked by [`Display::write_number`]
const PLACES: [u16; 5] = [10_000, 1_000, 100, 10, 1];

/// Character display context
pub type CharDisplay<H, const LINES: usize, const COLUMNS: usize> =
    Display<H, CharacterMode, LINES, COLUMNS>;

/// Bitmap display context
#[cfg(feature = "bitmap")]
pub type BitmapDisplay<H, F, const LINES: usize, const COLUMNS: usize> =
    Display<H, BitmapMode<F>, LINES, COLUMNS>;

/// Outcome of one sync pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncReport {
    /// Cells sent to the hardware
    pub written: usize,
    /// Bounding box of the cells sent (empty when nothing was sent)
    pub area: Area,
}

impl SyncReport {
    fn record(&mut self, line: u8, column: u8) {
        self.written += 1;
        self.area.include(line, column);
    }
}

/// Buffered display
///
/// - `H`: backend driver
/// - `M`: render mode ([`CharacterMode`] or `BitmapMode`)
/// - `LINES`, `COLUMNS`: grid size in character cells (1..=255 each)
pub struct Display<H, M, const LINES: usize, const COLUMNS: usize> {
    hal: H,
    mode: M,
    screen: ScreenBuffer<LINES, COLUMNS>,
    cursor: Cursor<LINES, COLUMNS>,
}

impl<H: DisplayHal, const LINES: usize, const COLUMNS: usize>
    Display<H, CharacterMode, LINES, COLUMNS>
{
    /// Create a character-mode display
    pub fn new(hal: H) -> Self {
        Self::with_mode(hal, CharacterMode)
    }
}

#[cfg(feature = "bitmap")]
impl<H: DisplayHal, F: Font, const LINES: usize, const COLUMNS: usize>
    Display<H, BitmapMode<F>, LINES, COLUMNS>
{
    /// Create a bitmap-mode display rendering `font` into `cell`-sized cells
    pub fn with_bitmap(hal: H, font: F, cell: CellSize) -> Self {
        let geometry = Geometry::new(LINES as u8, COLUMNS as u8, cell);
        Self::with_mode(hal, BitmapMode::new(font, geometry))
    }

    /// Like [`with_bitmap`](Self::with_bitmap), for backends whose page
    /// rows are `stride` bytes wide
    pub fn with_bitmap_stride(hal: H, font: F, cell: CellSize, stride: u16) -> Self {
        let geometry = Geometry::new(LINES as u8, COLUMNS as u8, cell).with_stride(stride);
        Self::with_mode(hal, BitmapMode::new(font, geometry))
    }

    /// Grid geometry in pixels
    pub fn geometry(&self) -> &Geometry {
        self.mode.geometry()
    }
}

impl<H, M, const LINES: usize, const COLUMNS: usize> Display<H, M, LINES, COLUMNS>
where
    H: DisplayHal,
    M: RenderMode<H>,
{
    const VALID_SIZE: () = assert!(
        LINES > 0 && COLUMNS > 0 && LINES <= 255 && COLUMNS <= 255,
        "display grid must be 1..=255 cells on each axis"
    );

    /// Create a display with an explicit render mode
    pub fn with_mode(hal: H, mode: M) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_SIZE;

        Self {
            hal,
            mode,
            screen: ScreenBuffer::new(),
            cursor: Cursor::new(),
        }
    }

    /// Bring up the hardware and home the cursor
    pub fn init(&mut self) -> Result<(), HalError> {
        debug!("display init: {} lines x {} columns", LINES, COLUMNS);
        self.hal.init()?;
        self.hal.sync_state(SyncState::Init)?;
        self.set_cursor(0, 0);
        Ok(())
    }

    /// Switch the panel on or off; buffer content is kept
    pub fn power(&mut self, state: Power) -> Result<(), HalError> {
        self.hal.power(state)
    }

    /// Show or hide the hardware cursor
    pub fn enable_cursor(&mut self, visible: bool) -> Result<(), HalError> {
        self.hal.cursor_visibility(visible)
    }

    /// Pass data to the backend's extension channel (registers, contrast)
    pub fn set_extended(&mut self, id: u8, data: &[u8]) -> Result<(), HalError> {
        self.hal.set_extended(id, data)
    }

    /// Upload driver-specific data (custom glyphs)
    pub fn write_extended(&mut self, id: u8, data: &[u8]) -> Result<(), HalError> {
        self.hal.write_extended(id, data)
    }

    /// Raw pixel storage of the backend, `None` on character-only drivers
    pub fn get_buffer(&mut self) -> Option<&mut [u8]> {
        self.hal.get_buffer()
    }

    /// Reset the lines selected by `mask` (bit n = line n)
    ///
    /// With `force`, those lines are retransmitted in full on the next sync.
    pub fn clear(&mut self, mask: u32, force: bool) {
        self.screen.clear(mask, force);
    }

    /// Blank the screen and force a full redraw
    pub fn clear_all(&mut self) {
        self.screen.clear_all();
    }

    /// Blank the screen, retransmitting only cells that were not blank
    pub fn clean(&mut self) {
        self.screen.clean();
    }

    /// Move the cursor; out-of-range coordinates are clamped
    pub fn set_cursor(&mut self, line: u8, column: u8) {
        self.cursor.set(line, column);
    }

    /// Move the cursor forward, stopping at the last cell
    pub fn advance_cursor(&mut self, n: usize) {
        self.cursor.advance(n);
    }

    /// Cursor position as (line, column)
    pub fn cursor(&self) -> (u8, u8) {
        self.cursor.position()
    }

    /// Cursor position as a linear index
    pub fn cursor_index(&self) -> usize {
        self.cursor.index()
    }

    /// Store a character at the cursor and advance
    ///
    /// Nothing is sent to the hardware until the next [`Display::sync`].
    pub fn write_char(&mut self, chr: u8) {
        self.screen.put(self.cursor.index(), chr);
        self.cursor.advance(1);
    }

    /// Write bytes up to the first NUL
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &chr in bytes.iter().take_while(|&&chr| chr != b'\0') {
            self.write_char(chr);
        }
    }

    /// Write a string up to the first NUL
    ///
    /// No wrapping beyond the cursor's own line-to-line advance.
    pub fn write_string(&mut self, text: &str) {
        self.write_bytes(text.as_bytes());
    }

    /// Write an unsigned number in base 10
    ///
    /// Digits before the first non-zero one are skipped unless
    /// `leading_zeros` is set, in which case all five places are written.
    /// The units digit is always written.
    pub fn write_number(&mut self, number: u16, leading_zeros: bool) {
        let mut started = leading_zeros;

        for place in PLACES {
            let digit = ((number / place) % 10) as u8;
            if digit != 0 || place == 1 {
                started = true;
            }
            if started {
                self.write_char(b'0' + digit);
            }
        }
    }

    /// Bring the hardware in line with the buffer
    ///
    /// Walks cells in row-major order and hands every dirty one to the
    /// render mode; clean cells cost nothing. A pass with dirty cells is
    /// bracketed by [`SyncState::PeriodicStart`] and
    /// [`SyncState::PeriodicEnd`].
    ///
    /// A cell the backend rejects stays dirty and the walk moves on, so one
    /// bad cell never starves the rest of the screen; the first error is
    /// returned once the pass is over. In deferred-commit modes a draw
    /// error means the pixel buffer is unusable, so the pass stops there
    /// and nothing is committed.
    pub fn sync(&mut self) -> Result<SyncReport, HalError> {
        let mut report = SyncReport::default();

        if !self.screen.is_dirty() {
            return Ok(report);
        }

        self.hal.sync_state(SyncState::PeriodicStart)?;
        let pass = self.walk(&mut report);
        let end = self.hal.sync_state(SyncState::PeriodicEnd);
        pass.and(end)?;

        trace!("sync: {} cells written", report.written);
        Ok(report)
    }

    fn walk(&mut self, report: &mut SyncReport) -> Result<(), HalError> {
        self.mode.begin(&mut self.hal)?;

        let mut failed = None;
        for (index, cell) in self.screen.cells_mut().iter_mut().enumerate() {
            if !cell.is_dirty() {
                continue;
            }

            let (line, column) = position_of(index, COLUMNS);
            if let Err(e) = self.mode.draw(&mut self.hal, line, column, cell.current) {
                warn!("cell ({}, {}) not written: {}", line, column, e);
                if <M as RenderMode<H>>::DEFERRED_COMMIT {
                    return Err(e);
                }
                failed = failed.or(Some(e));
                continue;
            }

            if !<M as RenderMode<H>>::DEFERRED_COMMIT {
                cell.commit();
            }
            report.record(line, column);
        }

        if report.written > 0 {
            if let Err(e) = self.mode.finish(&mut self.hal, report.area) {
                warn!("flush of {} cells failed: {}", report.written, e);
                return Err(e);
            }
            if <M as RenderMode<H>>::DEFERRED_COMMIT {
                self.screen.commit_all();
            }
        }

        failed.map_or(Ok(()), Err)
    }

    /// Cell at (line, column)
    pub fn cell(&self, line: u8, column: u8) -> Option<Cell> {
        self.screen.get(line as usize, column as usize).copied()
    }

    /// The screen buffer
    pub fn screen(&self) -> &ScreenBuffer<LINES, COLUMNS> {
        &self.screen
    }

    /// Number of cells waiting for the next sync
    pub fn dirty_count(&self) -> usize {
        self.screen.dirty_count()
    }

    /// The backend
    pub fn hal(&self) -> &H {
        &self.hal
    }

    /// The backend, mutably
    pub fn hal_mut(&mut self) -> &mut H {
        &mut self.hal
    }

    /// Give the backend back
    pub fn release(self) -> H {
        self.hal
    }

    /// Get number of lines
    pub const fn lines(&self) -> usize {
        LINES
    }

    /// Get number of columns
    pub const fn columns(&self) -> usize {
        COLUMNS
    }
}

impl<H, M, const LINES: usize, const COLUMNS: usize> core::fmt::Write
    for Display<H, M, LINES, COLUMNS>
where
    H: DisplayHal,
    M: RenderMode<H>,
{
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.write_string(s);
        Ok(())
    }
}
