//! Error types for the Nova assistant.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NovaError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Authorization denied: {reason}")]
    AuthorizationDenied { reason: String },

    #[error("Request rejected: {reason}")]
    Rejected { reason: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type NovaResult<T> = Result<T, NovaError>;
