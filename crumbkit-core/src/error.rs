use thiserror::Error;

use crate::scrub::ScrubError;
use crate::storage::StorageError;

/// Error outputs from `Crumbkit`
#[derive(Debug, Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum CrumbkitError {
    /// The presented configuration is not valid
    #[error("invalid_config: {0}")]
    InvalidConfig(String),
    /// The PII scrubber refused or failed to sanitize an event payload
    #[error("scrub_error: {0}")]
    Scrub(#[from] ScrubError),
    /// Unexpected error serializing or deserializing information
    #[error("serialization_error: {0}")]
    Serialization(String),
    /// The storage medium reported an error
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<serde_json::Error> for CrumbkitError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

/// Result type used across `crumbkit_core`.
pub type Result<T, E = CrumbkitError> = std::result::Result<T, E>;
