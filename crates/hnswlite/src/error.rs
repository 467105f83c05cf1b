//! Error types for `hnswlite`.
//!
//! Every fallible index operation returns [`Result`]. Errors are detected
//! before any mutation, so a failed call never leaves a half-applied change.
//! Error codes follow the pattern `HNSW-XXX` for easy grepping in logs.

use thiserror::Error;

/// Result type alias for `hnswlite` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in `hnswlite` operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Vector length does not match the index dimension (HNSW-001).
    #[error("[HNSW-001] Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension fixed at construction.
        expected: usize,
        /// Length of the rejected vector.
        actual: usize,
    },

    /// Identifier already present in the index (HNSW-002).
    #[error("[HNSW-002] Duplicate id '{0}'")]
    DuplicateId(String),

    /// Construction parameters rejected (HNSW-003).
    #[error("[HNSW-003] Invalid index parameters: {0}")]
    InvalidParams(String),

    /// Serialized bytes could not be decoded (HNSW-004).
    ///
    /// The buffer is unusable; rebuild the index from source data.
    #[error("[HNSW-004] Corrupted index data: {0}")]
    Corrupted(String),

    /// Configuration could not be loaded (HNSW-005).
    #[error("[HNSW-005] Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns the error code (e.g., "HNSW-001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::DimensionMismatch { .. } => "HNSW-001",
            Self::DuplicateId(_) => "HNSW-002",
            Self::InvalidParams(_) => "HNSW-003",
            Self::Corrupted(_) => "HNSW-004",
            Self::Config(_) => "HNSW-005",
        }
    }

    /// Returns true if the caller can retry with different input.
    ///
    /// Corrupted data is not recoverable: the serialized index has to be
    /// discarded and rebuilt by replaying inserts.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Corrupted(_))
    }
}
