//! Error types for EpochKV
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using EpochError
pub type Result<T> = std::result::Result<T, EpochError>;

/// Unified error type for EpochKV operations
#[derive(Debug, Error)]
pub enum EpochError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Codec Errors (backing file load)
    // -------------------------------------------------------------------------
    #[error("malformed row: {0}")]
    MalformedRow(String),

    #[error("malformed timestamp: {0}")]
    MalformedTimestamp(String),

    // -------------------------------------------------------------------------
    // Persistence Errors (backing file rewrite)
    // -------------------------------------------------------------------------
    #[error("persistence failed: {0}")]
    Persistence(String),

    // -------------------------------------------------------------------------
    // Business Outcomes
    // -------------------------------------------------------------------------
    #[error("record already exists for key '{key}' at timestamp {timestamp}")]
    Conflict { key: String, timestamp: i64 },
}

impl EpochError {
    /// Whether this is a per-operation outcome the caller can handle,
    /// as opposed to a load-time or persistence-time failure after which
    /// the process should not keep serving traffic.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EpochError::Conflict { .. })
    }
}
