//! Error types for Gatepass core primitives.

use thiserror::Error;

/// Errors produced while constructing core types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("malformed challenge id: {0}")]
    MalformedId(String),

    #[error("challenge id must not be empty")]
    EmptyId,
}
