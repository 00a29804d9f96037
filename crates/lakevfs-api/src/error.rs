//! Store-layer error type.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Failures surfaced by an [`ObjectStore`](crate::ObjectStore) backend.
///
/// `NotFound` is its own variant so callers can translate it into an
/// empty/false result where the contract asks for one (exists-checks,
/// directory probes) instead of string-matching error messages.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed repository, ref, or object does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Transport-level failure (connect, TLS, timeout, malformed response).
    #[error("transport error")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not decode into the expected wire type.
    #[error("failed to decode server response")]
    Decode(#[from] serde_json::Error),

    /// Request precondition violated before anything hit the wire.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
