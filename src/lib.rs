//! Opaque-handle C ABI and safe Rust bindings for runtime-owned counter and
//! seeded number objects.
//!
//! The crate is both sides of a cross-language boundary. Built as a cdylib
//! it exports a name-stable C surface (see [`ffi::raw`] and
//! `include/randcore.h`) that a host process links against: the runtime owns
//! every object and hands out pointer-sized opaque handles, and the host may
//! register a callback at init time that the runtime calls back across the
//! same boundary. Built as a plain library it offers the safe wrappers used
//! below, which go through the exact same exported functions.
//!
//! # Example
//!
//! ```no_run
//! use randcore::{Counter, RandomNumber};
//!
//! extern "C" fn on_notify() -> i32 {
//!     println!("runtime called back into the host");
//!     42
//! }
//!
//! fn main() -> randcore::Result<()> {
//!     // Handshake: must precede every handle operation.
//!     randcore::init_with_callback(on_notify)?;
//!
//!     let mut counter = Counter::new()?;
//!     assert_eq!(counter.value()?, 0);
//!     assert_eq!(counter.increment()?, 1);
//!
//!     let number = RandomNumber::new(5)?;
//!     println!("derived: {}", number.generate()?);
//!     assert_eq!(number.value()?, 5);
//!
//!     // Crosses the boundary and triggers `on_notify` before returning.
//!     randcore::notify()?;
//!
//!     Ok(())
//! }
//! ```

pub mod counter;
pub mod error;
pub mod ffi;
pub mod number;
mod runtime;

// Re-export main types at the crate root
pub use counter::Counter;
pub use error::{Error, Result};
pub use number::RandomNumber;
pub use runtime::CallbackFn;

use std::ffi::CStr;
use std::os::raw::c_char;

/// API version constants.
pub mod version {
    /// API major version.
    pub const MAJOR: i32 = 0;
    /// API minor version.
    pub const MINOR: i32 = 1;
    /// API patch version.
    pub const PATCH: i32 = 0;
}

/// Get the API version string (e.g., "0.1.0").
pub fn api_version() -> String {
    unsafe {
        let ptr = ffi::rn_api_version();
        if ptr.is_null() {
            return String::new();
        }
        let s = CStr::from_ptr(ptr).to_string_lossy().into_owned();
        ffi::rn_free_string(ptr as *mut c_char);
        s
    }
}

/// Check if the library is compatible with the given version.
///
/// Returns `true` if the library is compatible with code compiled against
/// the specified major.minor version.
pub fn api_version_compatible(major: i32, minor: i32) -> bool {
    ffi::rn_api_version_compatible(major, minor)
}

/// Complete the handshake without registering a callback.
///
/// Must be called before any handle operation. Safe to call multiple times.
pub fn init() -> Result<()> {
    let code = ffi::rn_init(None);
    if code != ffi::RN_OK {
        return Err(ffi::error_from_code(code));
    }
    Ok(())
}

/// Complete the handshake and register `callback` for reverse calls.
///
/// The callback slot is written at most once per process; if a callback is
/// already registered this call still succeeds but leaves it in place.
pub fn init_with_callback(callback: CallbackFn) -> Result<()> {
    let code = ffi::rn_init(Some(callback));
    if code != ffi::RN_OK {
        return Err(ffi::error_from_code(code));
    }
    Ok(())
}

/// Whether the handshake has completed.
pub fn is_initialized() -> bool {
    ffi::rn_is_initialized()
}

/// Signal the runtime.
///
/// The runtime invokes the registered callback exactly once, synchronously,
/// before this returns; with no callback registered this is a no-op.
/// Requires a completed handshake.
pub fn notify() -> Result<()> {
    unsafe {
        let mut err = ffi::RnError::default();
        let code = ffi::rn_notify(&mut err);
        ffi::check_error(code, &mut err)
    }
}
