//! Error types for the board engine

use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors that can occur in board operations.
///
/// Projection, allocation and drag resolution are total and never produce
/// these. Everything here originates in the task store.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Malformed task fields (empty title, unknown column, unusable position)
    #[error("invalid value for {field}: {message}")]
    ValidationFailed { field: String, message: String },

    /// Mutation targets a task that no longer exists
    #[error("task not found: {id}")]
    NotFound { id: String },

    /// Transport or backend failure
    #[error("task store unavailable: {message}")]
    StoreUnavailable { message: String },

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(Box<figment::Error>),
}

impl BoardError {
    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a store-unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }

    /// Check if the target task was already gone
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<figment::Error> for BoardError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}
