//! Display cell model

/// Character stored in freshly cleared cells
pub const BLANK: u8 = b' ';

/// Value of `previous` that no application write can be synchronized to,
/// forcing the next sync to retransmit the cell
pub const SENTINEL: u8 = b'\0';

/// One character position
///
/// `current` is what the application last wrote; `previous` is what was
/// last transmitted to the panel. The cell is synchronized when both match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cell {
    /// Active character
    pub current: u8,
    /// Last character sent to the hardware
    pub previous: u8,
}

impl Default for Cell {
    fn default() -> Self {
        Self::new()
    }
}

impl Cell {
    /// Blank cell that has never been transmitted
    pub const fn new() -> Self {
        Self {
            current: BLANK,
            previous: SENTINEL,
        }
    }

    /// Check if the panel lags behind this cell
    pub const fn is_dirty(&self) -> bool {
        self.current != self.previous
    }

    /// Record the current character as transmitted
    pub fn commit(&mut self) {
        self.previous = self.current;
    }

    /// Reset to blank, optionally forgetting what the panel shows
    pub fn reset(&mut self, force: bool) {
        self.current = BLANK;
        if force {
            self.previous = SENTINEL;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cell_is_dirty() {
        let cell = Cell::new();
        assert_eq!(cell.current, b' ');
        assert_eq!(cell.previous, b'\0');
        assert!(cell.is_dirty());
    }

    #[test]
    fn test_commit_and_clean_reset() {
        let mut cell = Cell::new();
        cell.current = b'A';
        cell.commit();
        assert!(!cell.is_dirty());

        // Clean reset keeps what the panel shows
        cell.reset(false);
        assert_eq!(cell.current, BLANK);
        assert_eq!(cell.previous, b'A');
        assert!(cell.is_dirty());

        cell.commit();
        cell.reset(false);
        assert!(!cell.is_dirty());
    }

    #[test]
    fn test_forced_reset_redraws_even_blank() {
        let mut cell = Cell::new();
        cell.commit();
        assert!(!cell.is_dirty());

        cell.reset(true);
        assert!(cell.is_dirty());
    }
}
