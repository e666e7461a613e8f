//! Screen buffer
//!
//! Fixed `LINES` x `COLUMNS` grid of [`Cell`]s. Storage is a 2D array, which
//! is laid out row-major and contiguous, so the flat view used by the sync
//! pass and the cursor's linear index address the same cells.

use crate::cell::Cell;

/// Line mask selecting every line
pub const ALL_LINES: u32 = u32::MAX;

/// Screen buffer for a `LINES` x `COLUMNS` display
#[derive(Debug, Clone)]
pub struct ScreenBuffer<const LINES: usize, const COLUMNS: usize> {
    cells: [[Cell; COLUMNS]; LINES],
}

impl<const LINES: usize, const COLUMNS: usize> Default for ScreenBuffer<LINES, COLUMNS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const LINES: usize, const COLUMNS: usize> ScreenBuffer<LINES, COLUMNS> {
    /// Create a blank buffer that will be fully redrawn on first sync
    pub const fn new() -> Self {
        Self {
            cells: [[Cell::new(); COLUMNS]; LINES],
        }
    }

    /// Reset every line whose bit is set in `mask`
    ///
    /// `current` goes back to space. With `force`, `previous` is reset to the
    /// sentinel so those lines are retransmitted even if the panel already
    /// shows spaces. Bits for lines past the end are ignored.
    pub fn clear(&mut self, mask: u32, force: bool) {
        for (line, row) in self.cells.iter_mut().enumerate() {
            if line < 32 && (mask >> line) & 1 == 1 {
                reset_row(row, force);
            }
        }
    }

    /// Blank every line and force a full redraw
    pub fn clear_all(&mut self) {
        for row in self.cells.iter_mut() {
            reset_row(row, true);
        }
    }

    /// Blank every line, retransmitting only cells that were not blank
    pub fn clean(&mut self) {
        for row in self.cells.iter_mut() {
            reset_row(row, false);
        }
    }

    /// Store a character at a linear index
    ///
    /// Out-of-range indices are ignored.
    pub fn put(&mut self, index: usize, chr: u8) {
        if let Some(cell) = self.cells.as_flattened_mut().get_mut(index) {
            cell.current = chr;
        }
    }

    /// Cell at (line, column)
    pub fn get(&self, line: usize, column: usize) -> Option<&Cell> {
        self.cells.get(line).and_then(|row| row.get(column))
    }

    /// Cells of one line
    pub fn line(&self, line: usize) -> Option<&[Cell; COLUMNS]> {
        self.cells.get(line)
    }

    /// All cells in row-major order
    pub fn cells(&self) -> &[Cell] {
        self.cells.as_flattened()
    }

    /// All cells in row-major order, mutably
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        self.cells.as_flattened_mut()
    }

    /// Number of cells whose content has not reached the panel
    pub fn dirty_count(&self) -> usize {
        self.cells().iter().filter(|cell| cell.is_dirty()).count()
    }

    /// Check if any cell needs transmitting
    pub fn is_dirty(&self) -> bool {
        self.cells().iter().any(Cell::is_dirty)
    }

    /// Mark every cell as transmitted
    pub fn commit_all(&mut self) {
        for cell in self.cells_mut() {
            cell.commit();
        }
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

fn reset_row(row: &mut [Cell], force: bool) {
    for cell in row {
        cell.reset(force);
    }
}
