//! # Error Types
//!
//! Structural errors raised while constructing envelope fields.

use thiserror::Error;

/// Errors that can occur while building or decoding envelope fields.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    /// A fixed-size byte field has the wrong length.
    #[error("Malformed envelope: {field} must be {expected} bytes, got {actual}")]
    Malformed {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The message id is not 64 lowercase/uppercase hex characters.
    #[error("Malformed envelope: message id must be 64 hex characters")]
    InvalidMessageId,

    /// Associated data could not be serialized or parsed.
    #[error("Invalid associated data: {0}")]
    AssociatedData(String),
}
