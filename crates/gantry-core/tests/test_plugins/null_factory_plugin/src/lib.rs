//! Shared library whose factory entry points never produce a factory.

use std::ffi::c_void;

/// Has the shape of a factory entry point but returns null.
#[unsafe(no_mangle)]
pub extern "C-unwind" fn create_null_factory() -> *mut c_void {
    std::ptr::null_mut()
}

/// Misnamed on purpose; hosts asking for `create_factory` will not find it.
#[unsafe(no_mangle)]
pub extern "C-unwind" fn create_factory_misnamed() -> *mut c_void {
    std::ptr::null_mut()
}
