//! Raw ABI tests, calling the exported functions the way a C host would.

use std::ffi::CStr;

use randcore::ffi::{
    self, RnCounter, RnError, RnNumber, RN_ERR_INVALID_ARGUMENT, RN_ERR_INVALID_HANDLE, RN_OK,
};

fn init() {
    assert_eq!(ffi::rn_init(None), RN_OK);
}

#[test]
fn test_counter_round_trip_over_raw_abi() {
    init();

    let mut handle = RnCounter::invalid();
    let mut err = RnError::default();
    assert_eq!(ffi::rn_counter_new(&mut handle, &mut err), RN_OK);
    assert!(handle.is_valid());

    let mut value = -1i32;
    assert_eq!(ffi::rn_counter_value(handle, &mut value, &mut err), RN_OK);
    assert_eq!(value, 0);

    assert_eq!(ffi::rn_counter_increment(handle, &mut value, &mut err), RN_OK);
    assert_eq!(value, 1);

    assert_eq!(ffi::rn_counter_free(handle, &mut err), RN_OK);
}

#[test]
fn test_stale_handle_reports_structured_error() {
    init();

    let mut handle = RnNumber::invalid();
    let mut err = RnError::default();
    assert_eq!(ffi::rn_number_new(3, &mut handle, &mut err), RN_OK);
    assert_eq!(ffi::rn_number_free(handle, &mut err), RN_OK);

    // Second free: checked error with a readable message.
    let code = ffi::rn_number_free(handle, &mut err);
    assert_eq!(code, RN_ERR_INVALID_HANDLE);
    assert_eq!(err.code, RN_ERR_INVALID_HANDLE);
    assert!(!err.message.is_null());
    let message = unsafe { CStr::from_ptr(err.message) }.to_string_lossy();
    assert_eq!(message, "invalid handle");
    ffi::rn_error_free(&mut err);
    assert!(err.message.is_null(), "rn_error_free must reset the struct");
}

#[test]
fn test_null_out_pointer_is_rejected() {
    init();

    let mut err = RnError::default();
    let code = ffi::rn_counter_new(std::ptr::null_mut(), &mut err);
    assert_eq!(code, RN_ERR_INVALID_ARGUMENT);
    ffi::rn_error_free(&mut err);
}

#[test]
fn test_version_string_over_raw_abi() {
    let ptr = ffi::rn_api_version();
    assert!(!ptr.is_null());
    let s = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
    assert_eq!(s, "0.1.0");
    ffi::rn_free_string(ptr as *mut _);
}
