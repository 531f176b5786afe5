//! Error types for breadcrumb storage backends.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised by a storage medium.
///
/// Host applications implementing [`DeviceStorage`](super::DeviceStorage)
/// return these across the FFI boundary.
#[derive(Debug, Error, uniffi::Error)]
pub enum StorageError {
    /// The medium is not present in this host environment.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Filesystem failures.
    #[error("io error: {0}")]
    Io(String),

    /// The record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Errors reported by the host's device storage.
    #[error("host storage error: {0}")]
    Host(String),

    /// Unexpected `UniFFI` callback error.
    #[error("unexpected uniffi callback error: {0}")]
    UnexpectedUniFFICallbackError(String),
}

impl From<uniffi::UnexpectedUniFFICallbackError> for StorageError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::UnexpectedUniFFICallbackError(error.reason)
    }
}

impl From<std::io::Error> for StorageError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}
