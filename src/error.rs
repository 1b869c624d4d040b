//! Error types for the randcore crate.

use thiserror::Error;

/// Result type alias for randcore operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for randcore operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Handle is zero, unknown, or already freed.
    #[error("invalid handle")]
    InvalidHandle,

    /// The runtime handshake has not completed yet.
    #[error("runtime not initialized")]
    NotInitialized,

    /// Function argument is invalid.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Unknown error.
    #[error("unknown error: {0}")]
    Unknown(String),
}

impl Error {
    /// Check if this is an invalid-handle error.
    pub fn is_invalid_handle(&self) -> bool {
        matches!(self, Error::InvalidHandle)
    }

    /// Check if this error means the handshake is still pending.
    pub fn is_not_initialized(&self) -> bool {
        matches!(self, Error::NotInitialized)
    }
}
