//! Shared display access
//!
//! The display core itself assumes a single thread of control. Targets that
//! write to the screen from interrupt handlers or from several tasks wrap the
//! display in a [`SharedDisplay`] so buffer mutation and sync never overlap.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

/// Display guarded by an embassy-sync blocking mutex
///
/// Use `CriticalSectionRawMutex` when interrupts touch the display and
/// `NoopRawMutex` when everything runs in one executor.
pub struct SharedDisplay<M: RawMutex, T> {
    inner: Mutex<M, RefCell<T>>,
}

impl<M: RawMutex, T> SharedDisplay<M, T> {
    /// Wrap a display
    pub const fn new(display: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(display)),
        }
    }

    /// Run `f` with exclusive access to the display
    ///
    /// # Panics
    ///
    /// Panics if called re-entrantly from inside `f`.
    pub fn lock<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// Exclusive access without locking, through a unique reference
    pub fn get_mut(&mut self) -> &mut T {
        self.inner.get_mut().get_mut()
    }

    /// Unwrap the display
    pub fn into_inner(self) -> T {
        self.inner.into_inner().into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::CharDisplay;
    use crate::mock::RecordingHal;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    type Lcd = CharDisplay<RecordingHal, 2, 8>;

    #[test]
    fn test_lock_writes_and_syncs() {
        let shared: SharedDisplay<NoopRawMutex, Lcd> =
            SharedDisplay::new(Lcd::new(RecordingHal::new()));

        shared.lock(|display| display.write_string("hi"));
        let report = shared.lock(|display| display.sync()).unwrap();
        assert_eq!(report.written, 16);

        let display = shared.into_inner();
        assert_eq!(display.cell(0, 1).unwrap().current, b'i');
    }

    #[test]
    fn test_get_mut() {
        let mut shared: SharedDisplay<NoopRawMutex, Lcd> =
            SharedDisplay::new(Lcd::new(RecordingHal::new()));

        shared.get_mut().set_cursor(1, 3);
        assert_eq!(shared.lock(|display| display.cursor()), (1, 3));
    }
}
