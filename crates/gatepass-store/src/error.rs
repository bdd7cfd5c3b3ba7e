//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The id allocator gave up after the bounded number of attempts.
    #[error("rolled {attempts} candidate ids without finding a free challenge id")]
    AllocationExhausted { attempts: u32 },

    /// Targeted row absent, or already in the terminal state for the
    /// requested transition. Names the offending field.
    #[error("item not found: {field}")]
    NotFound { field: &'static str },

    /// The backing store returned a result shape the decoder cannot
    /// interpret. Integration fault, not a normal runtime path.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
