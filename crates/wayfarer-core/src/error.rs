//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No session is registered under the given identifier.
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),

    /// The requested choice index is not part of the presented choice set.
    #[error("choice {index} not found in session {session_id}")]
    ChoiceNotFound {
        /// The session that was addressed.
        session_id: Uuid,
        /// The index the caller asked for.
        index: usize,
    },

    /// A choice was selected but could not be applied.
    #[error("choice rejected: {0}")]
    ChoiceRejected(String),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// Engine configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An infrastructure error (content loading, poisoned locks).
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
