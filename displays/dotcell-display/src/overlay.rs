//! Bitmap overlay
//!
//! Renders character cells into the pixel buffer of a pixel-addressable
//! backend. The buffer is page-organized: each byte holds 8 vertically
//! stacked pixels and a page row is `stride` bytes long (by default
//! `columns * cell width`, the grid's pixel width), so a cell at
//! (line, column) starts at
//!
//! ```text
//! column * cell.width + line * cell.pages() * stride
//! ```
//!
//! With 8-pixel-high cells and the default stride that is the familiar
//! `column * glyph_width + line * columns_in_pixels`.

use dotcell_hal::{Area, DisplayHal, HalError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::font::Font;
use crate::render::RenderMode;

/// Pixel footprint of one character cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellSize {
    /// Cell width in pixels
    pub width: u8,
    /// Cell height in pixels
    pub height: u8,
}

impl Default for CellSize {
    fn default() -> Self {
        Self::CELL_6X8
    }
}

impl CellSize {
    /// 5x8 glyph plus one column of spacing
    pub const CELL_6X8: Self = Self::new(6, 8);

    /// Square 8x8 cell
    pub const CELL_8X8: Self = Self::new(8, 8);

    /// Create a cell size
    pub const fn new(width: u8, height: u8) -> Self {
        Self { width, height }
    }

    /// Number of 8-pixel pages the cell spans
    pub const fn pages(&self) -> usize {
        (self.height as usize).div_ceil(8)
    }
}

/// Pixel geometry of a `lines` x `columns` character grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Geometry {
    /// Character lines
    pub lines: u8,
    /// Character columns
    pub columns: u8,
    /// Pixel footprint of each cell
    pub cell: CellSize,
    /// Bytes per page row of the backend buffer
    pub stride: u16,
}

impl Geometry {
    /// Create a geometry whose page rows are exactly as wide as the grid
    pub const fn new(lines: u8, columns: u8, cell: CellSize) -> Self {
        Self {
            lines,
            columns,
            cell,
            stride: columns as u16 * cell.width as u16,
        }
    }

    /// Use a backend whose page rows are `stride` bytes wide
    ///
    /// Panels wider than the grid leave the extra columns untouched. A
    /// stride narrower than the grid is raised to the grid width.
    pub const fn with_stride(mut self, stride: u16) -> Self {
        let width = self.pixel_width() as u16;
        self.stride = if stride > width { stride } else { width };
        self
    }

    /// Width of the grid in pixels
    pub const fn pixel_width(&self) -> usize {
        self.columns as usize * self.cell.width as usize
    }

    /// Height of the grid in pixels
    pub const fn pixel_height(&self) -> usize {
        self.lines as usize * self.cell.height as usize
    }

    /// Bytes of pixel buffer the grid needs
    pub const fn buffer_len(&self) -> usize {
        self.stride as usize * self.lines as usize * self.cell.pages()
    }

    /// Offset of the first byte of a cell in the pixel buffer
    pub const fn pixel_offset(&self, line: u8, column: u8) -> usize {
        column as usize * self.cell.width as usize
            + line as usize * self.cell.pages() * self.stride as usize
    }
}

/// Render one character into a page-organized pixel buffer
///
/// Codes the font has no entry for are drawn as the font's space glyph, or
/// as an empty cell if the font lacks that too. Glyphs narrower or shorter
/// than the cell are padded with unlit pixels; wider ones are cropped.
pub fn render_glyph<F: Font + ?Sized>(
    buffer: &mut [u8],
    geometry: &Geometry,
    font: &F,
    line: u8,
    column: u8,
    chr: u8,
) -> Result<(), HalError> {
    let glyph = font.glyph(chr).or_else(|| font.glyph(b' '));
    let glyph_width = font.width() as usize;
    let glyph_pages = font.pages() as usize;
    let cell_width = geometry.cell.width as usize;
    let origin = geometry.pixel_offset(line, column);

    for page in 0..geometry.cell.pages() {
        let start = origin + page * geometry.stride as usize;
        let row = buffer
            .get_mut(start..start + cell_width)
            .ok_or(HalError::BufferOverflow)?;

        for (x, byte) in row.iter_mut().enumerate() {
            *byte = match glyph {
                Some(bytes) if x < glyph_width && page < glyph_pages => {
                    bytes.get(page * glyph_width + x).copied().unwrap_or(0)
                }
                _ => 0,
            };
        }
    }

    Ok(())
}

/// Bitmap rendering: blit glyphs into the backend's pixel buffer, then
/// flush the touched region once per sync pass
#[derive(Debug, Clone)]
pub struct BitmapMode<F> {
    font: F,
    geometry: Geometry,
}

impl<F: Font> BitmapMode<F> {
    /// Create a bitmap mode for the given font and grid geometry
    pub const fn new(font: F, geometry: Geometry) -> Self {
        Self { font, geometry }
    }

    /// Grid geometry
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Active font
    pub fn font(&self) -> &F {
        &self.font
    }
}

impl<H: DisplayHal, F: Font> RenderMode<H> for BitmapMode<F> {
    const DEFERRED_COMMIT: bool = true;

    fn begin(&mut self, hal: &mut H) -> Result<(), HalError> {
        let len = hal.get_buffer().ok_or(HalError::NoBuffer)?.len();
        if len < self.geometry.buffer_len() {
            warn!(
                "pixel buffer holds {} bytes, grid needs {}",
                len,
                self.geometry.buffer_len()
            );
            return Err(HalError::BufferOverflow);
        }
        Ok(())
    }

    fn draw(&mut self, hal: &mut H, line: u8, column: u8, chr: u8) -> Result<(), HalError> {
        let buffer = hal.get_buffer().ok_or(HalError::NoBuffer)?;
        render_glyph(buffer, &self.geometry, &self.font, line, column, chr)
    }

    fn finish(&mut self, hal: &mut H, area: Area) -> Result<(), HalError> {
        hal.write_buffer(area)
    }
}
