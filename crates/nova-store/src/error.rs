//! Store-specific error types and conversions.

use nova_core::error::NovaError;

/// Store-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StoreError> for NovaError {
    fn from(err: StoreError) -> Self {
        NovaError::Storage(err.to_string())
    }
}
