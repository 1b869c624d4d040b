//! Counter objects owned by the runtime.

use crate::error::{Error, Result};
use crate::ffi::{self, check_error, RnCounter};

/// A counter living in the runtime's memory, reached through an opaque
/// handle.
///
/// The counter starts at 0 and only moves through [`increment`]. Dropping
/// the `Counter` releases the runtime-side object, so a double destroy
/// cannot be written.
///
/// [`increment`]: Counter::increment
///
/// # Example
///
/// ```no_run
/// # fn example() -> randcore::Result<()> {
/// randcore::init()?;
/// let mut counter = randcore::Counter::new()?;
/// assert_eq!(counter.value()?, 0);
/// assert_eq!(counter.increment()?, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Counter {
    handle: RnCounter,
}

impl Counter {
    /// Create a new counter. Requires a completed handshake.
    pub fn new() -> Result<Self> {
        unsafe {
            let mut handle = RnCounter::invalid();
            let mut err = ffi::RnError::default();

            let code = ffi::rn_counter_new(&mut handle, &mut err);
            check_error(code, &mut err)?;

            Ok(Self { handle })
        }
    }

    /// Read the current value without mutating the counter.
    pub fn value(&self) -> Result<i32> {
        if !self.handle.is_valid() {
            return Err(Error::InvalidHandle);
        }

        unsafe {
            let mut out = 0i32;
            let mut err = ffi::RnError::default();

            let code = ffi::rn_counter_value(self.handle, &mut out, &mut err);
            check_error(code, &mut err)?;

            Ok(out)
        }
    }

    /// Advance the counter by one and return the new value in the same
    /// round trip.
    pub fn increment(&mut self) -> Result<i32> {
        if !self.handle.is_valid() {
            return Err(Error::InvalidHandle);
        }

        unsafe {
            let mut out = 0i32;
            let mut err = ffi::RnError::default();

            let code = ffi::rn_counter_increment(self.handle, &mut out, &mut err);
            check_error(code, &mut err)?;

            Ok(out)
        }
    }

    /// Release the runtime-side object now instead of at drop time.
    pub fn close(&mut self) -> Result<()> {
        if !self.handle.is_valid() {
            return Ok(());
        }

        unsafe {
            let mut err = ffi::RnError::default();
            let code = ffi::rn_counter_free(self.handle, &mut err);
            self.handle = RnCounter::invalid();
            check_error(code, &mut err)
        }
    }
}

impl Drop for Counter {
    fn drop(&mut self) {
        if self.handle.is_valid() {
            let mut err = ffi::RnError::default();
            ffi::rn_counter_free(self.handle, &mut err);
            // Ignore errors on drop
            if err.code != ffi::RN_OK {
                ffi::rn_error_free(&mut err);
            }
        }
    }
}

// The runtime serializes access to its tables; the handle itself is plain
// data.
unsafe impl Send for Counter {}
unsafe impl Sync for Counter {}
