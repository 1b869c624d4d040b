//! Error conversion utilities for the FFI boundary.

use std::ffi::CStr;

use super::raw::{
    rn_error_free, RnError, RnErrorCode, RN_ERR_INVALID_ARGUMENT, RN_ERR_INVALID_HANDLE,
    RN_ERR_NOT_INITIALIZED, RN_OK,
};
use crate::error::Error;

/// Convert a bare error code to a crate [`Error`].
///
/// For functions that report failure through a code alone, with no
/// `RnError` out-struct to carry a message.
pub fn error_from_code(code: RnErrorCode) -> Error {
    match code {
        RN_ERR_INVALID_HANDLE => Error::InvalidHandle,
        RN_ERR_NOT_INITIALIZED => Error::NotInitialized,
        RN_ERR_INVALID_ARGUMENT => Error::InvalidArgument("invalid argument".to_string()),
        _ => Error::Unknown(format!("error code {code}")),
    }
}

/// Convert an `RnError` to a crate [`Error`] and free the C error.
///
/// # Safety
///
/// The `err` pointer must be valid and initialized.
pub unsafe fn error_from_rn(err: *mut RnError) -> Error {
    if err.is_null() {
        return Error::Unknown("null error pointer".to_string());
    }

    let code = (*err).code;

    // Extract the message before freeing.
    let message = if (*err).message.is_null() {
        "unknown error".to_string()
    } else {
        CStr::from_ptr((*err).message)
            .to_string_lossy()
            .into_owned()
    };

    rn_error_free(err);

    match code {
        RN_ERR_INVALID_HANDLE => Error::InvalidHandle,
        RN_ERR_NOT_INITIALIZED => Error::NotInitialized,
        RN_ERR_INVALID_ARGUMENT => Error::InvalidArgument(message),
        _ => Error::Unknown(message),
    }
}

/// Check an error code and convert to Result.
///
/// # Safety
///
/// The `err` pointer must be valid and initialized.
pub unsafe fn check_error(code: RnErrorCode, err: *mut RnError) -> crate::Result<()> {
    if code == RN_OK {
        // Free the error struct even on success (safe no-op).
        if !err.is_null() {
            rn_error_free(err);
        }
        Ok(())
    } else {
        Err(error_from_rn(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::raw::RN_ERR_UNKNOWN;

    #[test]
    fn test_error_from_code_maps_every_variant() {
        assert!(matches!(
            error_from_code(RN_ERR_INVALID_HANDLE),
            Error::InvalidHandle
        ));
        assert!(matches!(
            error_from_code(RN_ERR_NOT_INITIALIZED),
            Error::NotInitialized
        ));
        assert!(matches!(
            error_from_code(RN_ERR_INVALID_ARGUMENT),
            Error::InvalidArgument(_)
        ));
        assert!(matches!(
            error_from_code(RN_ERR_UNKNOWN),
            Error::Unknown(_)
        ));
        // Codes this build does not know about still surface as Unknown.
        assert!(matches!(error_from_code(57), Error::Unknown(_)));
    }
}
