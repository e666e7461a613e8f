//! Cursor addressing
//!
//! The cursor is a single linear index into the row-major screen buffer
//! (`line * COLUMNS + column`), always in `[0, LINES * COLUMNS - 1]`.
//! Units are character cells regardless of how many pixels a cell spans on
//! a bitmap panel; pixel placement lives in [`crate::overlay::Geometry`].

/// Saturating cursor over a `LINES` x `COLUMNS` grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cursor<const LINES: usize, const COLUMNS: usize> {
    index: usize,
}

impl<const LINES: usize, const COLUMNS: usize> Cursor<LINES, COLUMNS> {
    /// Number of addressable cells
    pub const CELLS: usize = LINES * COLUMNS;

    /// Last valid linear index
    pub const LAST: usize = Self::CELLS - 1;

    /// Cursor at (0, 0)
    pub const fn new() -> Self {
        Self { index: 0 }
    }

    /// Move to (line, column), clamping each coordinate independently
    pub fn set(&mut self, line: u8, column: u8) {
        let line = (line as usize).min(LINES - 1);
        let column = (column as usize).min(COLUMNS - 1);
        self.index = line * COLUMNS + column;
    }

    /// Move forward by `n` cells
    ///
    /// Overruns stop at the last cell instead of wrapping to line 0, so
    /// overlong text keeps overwriting the last cell rather than earlier
    /// lines.
    pub fn advance(&mut self, n: usize) {
        self.index = self.index.saturating_add(n).min(Self::LAST);
    }

    /// Linear index into the buffer
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Current line
    pub const fn line(&self) -> u8 {
        (self.index / COLUMNS) as u8
    }

    /// Current column
    pub const fn column(&self) -> u8 {
        (self.index % COLUMNS) as u8
    }

    /// Current (line, column) pair
    pub const fn position(&self) -> (u8, u8) {
        (self.line(), self.column())
    }
}

/// (line, column) of a linear index in a grid `columns` wide
pub(crate) const fn position_of(index: usize, columns: usize) -> (u8, u8) {
    ((index / columns) as u8, (index % columns) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    type Cur = Cursor<2, 16>;

    #[test]
    fn test_set_clamps_each_axis() {
        let mut cursor = Cur::new();
        cursor.set(1, 5);
        assert_eq!(cursor.position(), (1, 5));
        assert_eq!(cursor.index(), 21);

        cursor.set(7, 3);
        assert_eq!(cursor.position(), (1, 3));

        cursor.set(0, 200);
        assert_eq!(cursor.position(), (0, 15));
    }

    #[test]
    fn test_advance_crosses_lines() {
        let mut cursor = Cur::new();
        cursor.set(0, 14);
        cursor.advance(3);
        assert_eq!(cursor.position(), (1, 1));
    }

    #[test]
    fn test_advance_saturates_at_last_cell() {
        let mut cursor = Cur::new();
        cursor.set(1, 10);
        cursor.advance(100);
        assert_eq!(cursor.index(), Cur::LAST);
        assert_eq!(cursor.position(), (1, 15));

        cursor.advance(1);
        assert_eq!(cursor.index(), Cur::LAST);

        cursor.advance(usize::MAX);
        assert_eq!(cursor.index(), Cur::LAST);
    }

    #[test]
    fn test_single_cell_grid() {
        let mut cursor = Cursor::<1, 1>::new();
        cursor.advance(5);
        assert_eq!(cursor.position(), (0, 0));
        cursor.set(9, 9);
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn test_position_of() {
        assert_eq!(position_of(0, 20), (0, 0));
        assert_eq!(position_of(19, 20), (0, 19));
        assert_eq!(position_of(20, 20), (1, 0));
        assert_eq!(position_of(79, 20), (3, 19));
    }

    proptest! {
        #[test]
        fn prop_cursor_stays_in_bounds(line in any::<u8>(), column in any::<u8>(), n in 0usize..10_000) {
            let mut cursor = Cursor::<4, 20>::new();
            cursor.set(line, column);
            prop_assert!(cursor.index() <= Cursor::<4, 20>::LAST);
            prop_assert!(cursor.line() < 4);
            prop_assert!(cursor.column() < 20);

            let before = cursor.index();
            cursor.advance(n);
            prop_assert!(cursor.index() <= Cursor::<4, 20>::LAST);
            prop_assert_eq!(cursor.index(), (before + n).min(Cursor::<4, 20>::LAST));
        }

        #[test]
        fn prop_position_roundtrips_through_set(line in 0u8..4, column in 0u8..20) {
            let mut cursor = Cursor::<4, 20>::new();
            cursor.set(line, column);
            prop_assert_eq!(cursor.position(), (line, column));
            prop_assert_eq!(position_of(cursor.index(), 20), (line, column));
        }
    }
}
