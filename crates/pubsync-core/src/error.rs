//! Error types for pubsync Core.

use thiserror::Error;

/// Errors that can occur while building or decoding names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid component TLV-TYPE: {0}")]
    InvalidComponentType(u64),

    #[error("truncated TLV: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    #[error("unexpected TLV-TYPE: expected {expected}, got {got}")]
    UnexpectedType { expected: u64, got: u64 },

    #[error("invalid NonNegativeInteger length: {0}")]
    InvalidNniLength(usize),

    #[error("{0} trailing bytes after TLV")]
    TrailingBytes(usize),

    #[error("invalid name URI: {0}")]
    InvalidUri(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
