//! Recording HAL for tests

use dotcell_hal::{Area, DisplayHal, HalError, Power, SyncState};

/// One HAL call as seen by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Init,
    Power(Power),
    SetCursor(u8, u8),
    WriteChar(u8),
    CursorVisibility(bool),
    SetExtended(u8, Vec<u8>),
    WriteBuffer(Area),
}

/// Backend that records every call and can be told to fail
#[derive(Debug, Default)]
pub struct RecordingHal {
    pub calls: Vec<Call>,
    /// Lifecycle notifications, kept apart from `calls`
    pub states: Vec<SyncState>,
    /// Pixel buffer; `None` makes this a character-only backend
    pub pixels: Option<Vec<u8>>,
    /// Fail the n-th `write_char` (0-based, counted over the HAL lifetime)
    pub fail_write_at: Option<usize>,
    /// Reject every `set_cursor` to this column
    pub fail_column: Option<u8>,
    /// Fail every `write_buffer`
    pub fail_flush: bool,
    writes: usize,
}

impl RecordingHal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pixels(len: usize) -> Self {
        Self {
            pixels: Some(vec![0; len]),
            ..Self::default()
        }
    }

    /// (line, column, chr) for every cursor move followed by a write
    pub fn writes(&self) -> Vec<(u8, u8, u8)> {
        self.calls
            .windows(2)
            .filter_map(|pair| match pair {
                [Call::SetCursor(line, column), Call::WriteChar(chr)] => {
                    Some((*line, *column, *chr))
                }
                _ => None,
            })
            .collect()
    }

    pub fn write_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::WriteChar(_)))
            .count()
    }

    pub fn flushes(&self) -> Vec<Area> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::WriteBuffer(area) => Some(*area),
                _ => None,
            })
            .collect()
    }

    pub fn reset(&mut self) {
        self.calls.clear();
    }
}

impl DisplayHal for RecordingHal {
    fn init(&mut self) -> Result<(), HalError> {
        self.calls.push(Call::Init);
        Ok(())
    }

    fn power(&mut self, state: Power) -> Result<(), HalError> {
        self.calls.push(Call::Power(state));
        Ok(())
    }

    fn set_cursor(&mut self, line: u8, column: u8) -> Result<(), HalError> {
        if self.fail_column == Some(column) {
            return Err(HalError::InvalidCoordinates);
        }
        self.calls.push(Call::SetCursor(line, column));
        Ok(())
    }

    fn write_char(&mut self, chr: u8) -> Result<(), HalError> {
        let n = self.writes;
        self.writes += 1;
        if self.fail_write_at == Some(n) {
            return Err(HalError::Communication);
        }
        self.calls.push(Call::WriteChar(chr));
        Ok(())
    }

    fn cursor_visibility(&mut self, visible: bool) -> Result<(), HalError> {
        self.calls.push(Call::CursorVisibility(visible));
        Ok(())
    }

    fn set_extended(&mut self, id: u8, data: &[u8]) -> Result<(), HalError> {
        self.calls.push(Call::SetExtended(id, data.to_vec()));
        Ok(())
    }

    fn get_buffer(&mut self) -> Option<&mut [u8]> {
        self.pixels.as_deref_mut()
    }

    fn write_buffer(&mut self, area: Area) -> Result<(), HalError> {
        if self.pixels.is_none() {
            return Err(HalError::Unsupported);
        }
        if self.fail_flush {
            return Err(HalError::Timeout);
        }
        self.calls.push(Call::WriteBuffer(area));
        Ok(())
    }

    fn sync_state(&mut self, state: SyncState) -> Result<(), HalError> {
        self.states.push(state);
        Ok(())
    }
}
