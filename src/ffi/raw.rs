//! The exported C ABI.
//!
//! Every function here is `extern "C"` with a pinned, unmangled name so a
//! host compiled from another language can link against the cdylib. Handles
//! cross the boundary as pointer-sized opaque tokens; results come back as an
//! error code plus out-parameters. Rust callers should prefer the safe
//! wrappers in the parent modules.

use std::ffi::CString;
use std::os::raw::{c_char, c_int};

use super::handles::{RnCounter, RnNumber};
use crate::error::Error;
use crate::runtime::{self, CallbackFn, Runtime};
use crate::version;

/// Error code returned by the exported functions.
pub type RnErrorCode = c_int;

// Error codes
pub const RN_OK: RnErrorCode = 0;
pub const RN_ERR_INVALID_HANDLE: RnErrorCode = 1;
pub const RN_ERR_NOT_INITIALIZED: RnErrorCode = 2;
pub const RN_ERR_INVALID_ARGUMENT: RnErrorCode = 3;
pub const RN_ERR_UNKNOWN: RnErrorCode = 99;

/// C error structure filled on failure. The message is allocated by the
/// library and must be released with [`rn_error_free`].
#[repr(C)]
pub struct RnError {
    pub code: RnErrorCode,
    pub message: *mut c_char,
}

impl Default for RnError {
    fn default() -> Self {
        Self {
            code: RN_OK,
            message: std::ptr::null_mut(),
        }
    }
}

/// Callback registered by the host at init time. `None` leaves the slot
/// empty; `rn_notify` is then a no-op.
pub type RnCallback = Option<CallbackFn>;

fn code_for(err: &Error) -> RnErrorCode {
    match err {
        Error::InvalidHandle => RN_ERR_INVALID_HANDLE,
        Error::NotInitialized => RN_ERR_NOT_INITIALIZED,
        Error::InvalidArgument(_) => RN_ERR_INVALID_ARGUMENT,
        Error::Unknown(_) => RN_ERR_UNKNOWN,
    }
}

/// Record a failure in the out-struct (if provided) and return its code.
fn fail(err: *mut RnError, e: Error) -> RnErrorCode {
    let code = code_for(&e);
    if !err.is_null() {
        let message = CString::new(e.to_string())
            .map(CString::into_raw)
            .unwrap_or(std::ptr::null_mut());
        unsafe {
            (*err).code = code;
            (*err).message = message;
        }
    }
    code
}

/// Run an operation against the process-wide runtime.
fn with_runtime<T>(f: impl FnOnce(&mut Runtime) -> crate::Result<T>) -> crate::Result<T> {
    let mut rt = runtime::global()
        .lock()
        .map_err(|_| Error::Unknown("runtime lock poisoned".to_string()))?;
    f(&mut rt)
}

// Version

/// API version string (e.g. "0.1.0"). Free with [`rn_free_string`].
#[no_mangle]
pub extern "C" fn rn_api_version() -> *const c_char {
    let s = format!("{}.{}.{}", version::MAJOR, version::MINOR, version::PATCH);
    CString::new(s)
        .map(CString::into_raw)
        .unwrap_or(std::ptr::null_mut())
}

/// Whether the library is link-compatible with code built against the given
/// major.minor version.
#[no_mangle]
pub extern "C" fn rn_api_version_compatible(major: c_int, minor: c_int) -> bool {
    major == version::MAJOR && minor <= version::MINOR
}

// Memory management

/// Free a string allocated by the library.
#[no_mangle]
pub extern "C" fn rn_free_string(s: *mut c_char) {
    if s.is_null() {
        return;
    }
    unsafe {
        drop(CString::from_raw(s));
    }
}

/// Free an error's message and reset it to the ok state.
#[no_mangle]
pub extern "C" fn rn_error_free(err: *mut RnError) {
    if err.is_null() {
        return;
    }
    unsafe {
        rn_free_string((*err).message);
        (*err).code = RN_OK;
        (*err).message = std::ptr::null_mut();
    }
}

// Handshake

/// Complete the handshake, registering the host callback (may be `None`).
///
/// Must precede every other call except the version probes. Safe to call
/// multiple times; the callback slot is written at most once.
#[no_mangle]
pub extern "C" fn rn_init(callback: RnCallback) -> RnErrorCode {
    match with_runtime(|rt| {
        rt.init(callback);
        Ok(())
    }) {
        Ok(()) => RN_OK,
        Err(e) => fail(std::ptr::null_mut(), e),
    }
}

/// Explicit handshake state flag.
#[no_mangle]
pub extern "C" fn rn_is_initialized() -> bool {
    with_runtime(|rt| Ok(rt.is_initialized())).unwrap_or(false)
}

/// Signal the runtime. Invokes the registered callback exactly once,
/// synchronously, before returning; a no-op when no callback is registered.
#[no_mangle]
pub extern "C" fn rn_notify(err: *mut RnError) -> RnErrorCode {
    // Copy the callback out so the reverse call runs outside the runtime
    // lock and may re-enter the library.
    let callback = match with_runtime(|rt| rt.callback()) {
        Ok(cb) => cb,
        Err(e) => return fail(err, e),
    };
    if let Some(cb) = callback {
        let value = cb();
        log::debug!("host callback returned {value}");
    }
    RN_OK
}

// Counter objects

/// Create a counter object. The initial value is 0.
#[no_mangle]
pub extern "C" fn rn_counter_new(out: *mut RnCounter, err: *mut RnError) -> RnErrorCode {
    if out.is_null() {
        return fail(err, Error::InvalidArgument("null out pointer".to_string()));
    }
    match with_runtime(|rt| rt.counter_new()) {
        Ok(token) => {
            unsafe { *out = RnCounter::from_raw(token) };
            RN_OK
        }
        Err(e) => fail(err, e),
    }
}

/// Advance the counter by one and return the new value through `out`.
#[no_mangle]
pub extern "C" fn rn_counter_increment(
    handle: RnCounter,
    out: *mut i32,
    err: *mut RnError,
) -> RnErrorCode {
    if out.is_null() {
        return fail(err, Error::InvalidArgument("null out pointer".to_string()));
    }
    match with_runtime(|rt| rt.counter_increment(handle.raw())) {
        Ok(value) => {
            unsafe { *out = value };
            RN_OK
        }
        Err(e) => fail(err, e),
    }
}

/// Read the counter without mutating it.
#[no_mangle]
pub extern "C" fn rn_counter_value(
    handle: RnCounter,
    out: *mut i32,
    err: *mut RnError,
) -> RnErrorCode {
    if out.is_null() {
        return fail(err, Error::InvalidArgument("null out pointer".to_string()));
    }
    match with_runtime(|rt| rt.counter_value(handle.raw())) {
        Ok(value) => {
            unsafe { *out = value };
            RN_OK
        }
        Err(e) => fail(err, e),
    }
}

/// Release a counter. The handle is dead afterwards; reuse (including a
/// second free) is a checked `RN_ERR_INVALID_HANDLE`.
#[no_mangle]
pub extern "C" fn rn_counter_free(handle: RnCounter, err: *mut RnError) -> RnErrorCode {
    match with_runtime(|rt| rt.counter_free(handle.raw())) {
        Ok(()) => RN_OK,
        Err(e) => fail(err, e),
    }
}

// Seeded number objects

/// Create a number object storing `value` immutably.
#[no_mangle]
pub extern "C" fn rn_number_new(
    value: i32,
    out: *mut RnNumber,
    err: *mut RnError,
) -> RnErrorCode {
    if out.is_null() {
        return fail(err, Error::InvalidArgument("null out pointer".to_string()));
    }
    match with_runtime(|rt| rt.number_new(value)) {
        Ok(token) => {
            unsafe { *out = RnNumber::from_raw(token) };
            RN_OK
        }
        Err(e) => fail(err, e),
    }
}

/// Read the stored value.
#[no_mangle]
pub extern "C" fn rn_number_value(
    handle: RnNumber,
    out: *mut i32,
    err: *mut RnError,
) -> RnErrorCode {
    if out.is_null() {
        return fail(err, Error::InvalidArgument("null out pointer".to_string()));
    }
    match with_runtime(|rt| rt.number_value(handle.raw())) {
        Ok(value) => {
            unsafe { *out = value };
            RN_OK
        }
        Err(e) => fail(err, e),
    }
}

/// Derive a value from the stored seed. The stored value is never mutated.
#[no_mangle]
pub extern "C" fn rn_number_generate(
    handle: RnNumber,
    out: *mut i32,
    err: *mut RnError,
) -> RnErrorCode {
    if out.is_null() {
        return fail(err, Error::InvalidArgument("null out pointer".to_string()));
    }
    match with_runtime(|rt| rt.number_generate(handle.raw())) {
        Ok(value) => {
            unsafe { *out = value };
            RN_OK
        }
        Err(e) => fail(err, e),
    }
}

/// Release a number object.
#[no_mangle]
pub extern "C" fn rn_number_free(handle: RnNumber, err: *mut RnError) -> RnErrorCode {
    match with_runtime(|rt| rt.number_free(handle.raw())) {
        Ok(()) => RN_OK,
        Err(e) => fail(err, e),
    }
}
