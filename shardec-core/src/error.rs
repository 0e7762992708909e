//! Error types for shardec
//!
//! Provides a unified error type for all shardec operations.
//! Every variant is fatal to the operation that raised it; the one
//! place an error is tolerated instead of propagated is the decoder,
//! which folds unreadable fragment stores into the erasure set until
//! the parity threshold is exceeded.

use thiserror::Error;

/// Result type alias for shardec operations
pub type Result<T> = std::result::Result<T, ShardecError>;

/// Unified error type for shardec
#[derive(Error, Debug)]
pub enum ShardecError {
    // ===== Parameter Errors =====
    #[error("invalid code parameters: k={k}, p={p} (require k >= 1, p >= 1, k + p < 255)")]
    InvalidParameters { k: usize, p: usize },

    #[error("file too small to partition: {file_len} bytes across {k} fragments")]
    DegenerateBlock { file_len: u64, k: usize },

    // ===== Decode Errors =====
    #[error("too many fragments lost: {lost} unreadable, can recover at most {max}")]
    TooManyErasures { lost: usize, max: usize },

    #[error("decode submatrix is singular; fragment set is internally inconsistent")]
    SingularMatrix,

    // ===== Layout Errors =====
    #[error("manifest error: {0}")]
    Manifest(String),

    // ===== I/O Errors =====
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ===== Generic Errors =====
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for ShardecError {
    fn from(err: serde_json::Error) -> Self {
        ShardecError::Manifest(err.to_string())
    }
}
