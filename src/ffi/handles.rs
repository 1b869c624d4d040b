//! Handle types for opaque references to runtime-owned objects.
//!
//! Each handle is a newtype around a `u64` token so the two object kinds
//! cannot be mixed up at the call site. The token is content-opaque: callers
//! may only hand it back to the exported functions.

/// Macro to define a handle type.
macro_rules! define_handle {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[repr(C)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            _h: u64,
        }

        impl $name {
            /// Create an invalid (null) handle.
            #[inline]
            pub const fn invalid() -> Self {
                Self { _h: 0 }
            }

            /// Check if this handle is valid (non-zero).
            #[inline]
            pub const fn is_valid(&self) -> bool {
                self._h != 0
            }

            /// The raw token, for the runtime's object tables.
            #[inline]
            pub(crate) const fn raw(&self) -> u64 {
                self._h
            }

            /// Wrap a token issued by the runtime.
            #[inline]
            pub(crate) const fn from_raw(token: u64) -> Self {
                Self { _h: token }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::invalid()
            }
        }
    };
}

define_handle!(RnCounter, "Opaque handle to a counter object.");
define_handle!(RnNumber, "Opaque handle to a seeded number object.");
