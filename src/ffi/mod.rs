//! The C ABI boundary.
//!
//! `raw` holds the exported `extern "C"` surface, `handles` the opaque
//! tokens that cross it. Rust users should prefer the safe wrappers in the
//! parent modules.

pub mod error;
pub mod handles;
pub mod raw;

pub use error::{check_error, error_from_code, error_from_rn};
pub use handles::*;
pub use raw::*;
