//! Error types for smartnote-core

use thiserror::Error;

/// Result type alias using smartnote-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in smartnote-core operations
///
/// AI proxy failures have their own type ([`crate::ai::AiError`]) so that a
/// failed model call can never be confused with a note-state error.
#[derive(Error, Debug)]
pub enum Error {
    /// Note not found where existence is required
    #[error("Note not found: {0}")]
    NotFound(String),

    /// Note rejected before reaching the store
    #[error("Invalid note: {0}")]
    Validation(String),

    /// IO error from the durable store
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error at the storage boundary
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
