//! Error taxonomy shared by the habit store, the upsert path and the
//! session layer.
//!
//! Command handlers wrap these in `anyhow` for display; library callers can
//! match on the variants, e.g. to tell a missing habit apart from a failing
//! database.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DhaError>;

#[derive(Error, Debug)]
pub enum DhaError {
    /// Malformed input rejected before it reaches the store.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A uniqueness constraint rejected an insert.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Credentials(String),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Session expired")]
    SessionExpired,

    #[error("AI request failed: {0}")]
    Ai(String),
}

impl DhaError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DhaError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        DhaError::NotFound(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DhaError::NotFound(_))
    }
}
