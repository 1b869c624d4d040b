//! Seeded number objects owned by the runtime.

use crate::error::{Error, Result};
use crate::ffi::{self, check_error, RnNumber};

/// An immutable integer stored in the runtime, plus a derived `generate`
/// operation.
///
/// The stored value is fixed at creation; [`generate`] computes fresh values
/// from it without ever changing it. Dropping the `RandomNumber` releases
/// the runtime-side object.
///
/// [`generate`]: RandomNumber::generate
///
/// # Example
///
/// ```no_run
/// # fn example() -> randcore::Result<()> {
/// randcore::init()?;
/// let number = randcore::RandomNumber::new(5)?;
/// let _derived = number.generate()?;
/// assert_eq!(number.value()?, 5);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RandomNumber {
    handle: RnNumber,
}

impl RandomNumber {
    /// Create a number object storing `value`. Requires a completed
    /// handshake.
    pub fn new(value: i32) -> Result<Self> {
        unsafe {
            let mut handle = RnNumber::invalid();
            let mut err = ffi::RnError::default();

            let code = ffi::rn_number_new(value, &mut handle, &mut err);
            check_error(code, &mut err)?;

            Ok(Self { handle })
        }
    }

    /// The value supplied at creation.
    pub fn value(&self) -> Result<i32> {
        if !self.handle.is_valid() {
            return Err(Error::InvalidHandle);
        }

        unsafe {
            let mut out = 0i32;
            let mut err = ffi::RnError::default();

            let code = ffi::rn_number_value(self.handle, &mut out, &mut err);
            check_error(code, &mut err)?;

            Ok(out)
        }
    }

    /// Derive a value from the stored seed. Repeat calls generally return
    /// different values; the stored value never changes.
    pub fn generate(&self) -> Result<i32> {
        if !self.handle.is_valid() {
            return Err(Error::InvalidHandle);
        }

        unsafe {
            let mut out = 0i32;
            let mut err = ffi::RnError::default();

            let code = ffi::rn_number_generate(self.handle, &mut out, &mut err);
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
            let code = ffi::rn_number_free(self.handle, &mut err);
            self.handle = RnNumber::invalid();
            check_error(code, &mut err)
        }
    }
}

impl Drop for RandomNumber {
    fn drop(&mut self) {
        if self.handle.is_valid() {
            let mut err = ffi::RnError::default();
            ffi::rn_number_free(self.handle, &mut err);
            // Ignore errors on drop
            if err.code != ffi::RN_OK {
                ffi::rn_error_free(&mut err);
            }
        }
    }
}

unsafe impl Send for RandomNumber {}
unsafe impl Sync for RandomNumber {}
