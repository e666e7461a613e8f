//! Types shared across the HAL boundary

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Power states of a display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Power {
    /// Panel dark (no backlight, or controller display-off)
    Off,
    /// Panel visible
    #[default]
    On,
}

impl From<bool> for Power {
    fn from(on: bool) -> Self {
        if on {
            Power::On
        } else {
            Power::Off
        }
    }
}

/// Points in the display's life reported to [`crate::DisplayHal::sync_state`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SyncState {
    /// Hardware bring-up finished
    Init,
    /// A sync pass with dirty cells is about to write
    PeriodicStart,
    /// That sync pass is done, whether or not it succeeded
    PeriodicEnd,
}

/// Rectangular region of the screen, in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Area {
    /// First column
    pub column: u8,
    /// First line
    pub line: u8,
    /// Width in columns
    pub columns: u8,
    /// Height in lines
    pub lines: u8,
}

impl Area {
    /// Area covering a single cell
    pub const fn cell(line: u8, column: u8) -> Self {
        Self {
            column,
            line,
            columns: 1,
            lines: 1,
        }
    }

    /// Area covering a whole `lines` x `columns` screen
    pub const fn full(lines: u8, columns: u8) -> Self {
        Self {
            column: 0,
            line: 0,
            columns,
            lines,
        }
    }

    /// Last column covered (inclusive)
    pub const fn last_column(&self) -> u8 {
        self.column + self.columns.saturating_sub(1)
    }

    /// Last line covered (inclusive)
    pub const fn last_line(&self) -> u8 {
        self.line + self.lines.saturating_sub(1)
    }

    /// Check whether a cell lies inside the area
    pub const fn contains(&self, line: u8, column: u8) -> bool {
        self.columns > 0
            && self.lines > 0
            && line >= self.line
            && line <= self.last_line()
            && column >= self.column
            && column <= self.last_column()
    }

    /// Grow the area so it also covers the given cell
    pub fn include(&mut self, line: u8, column: u8) {
        if self.columns == 0 || self.lines == 0 {
            *self = Self::cell(line, column);
            return;
        }

        let first_line = self.line.min(line);
        let first_column = self.column.min(column);
        let last_line = self.last_line().max(line);
        let last_column = self.last_column().max(column);

        self.line = first_line;
        self.column = first_column;
        self.lines = last_line - first_line + 1;
        self.columns = last_column - first_column + 1;
    }
}

/// Errors reported by display backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// Bus or pin transfer failed
    Communication,
    /// Controller did not respond in time
    Timeout,
    /// Operation not available on this controller
    Unsupported,
    /// Backend has no pixel buffer
    NoBuffer,
    /// Pixel buffer too small for the configured geometry
    BufferOverflow,
    /// Coordinates outside what the controller can address
    InvalidCoordinates,
}

impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            HalError::Communication => "display communication failed",
            HalError::Timeout => "display timed out",
            HalError::Unsupported => "operation not supported by display",
            HalError::NoBuffer => "display has no pixel buffer",
            HalError::BufferOverflow => "pixel buffer too small",
            HalError::InvalidCoordinates => "coordinates out of range",
        };
        f.write_str(msg)
    }
}
