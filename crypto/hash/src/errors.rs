//! Error types for field element decoding

use thiserror::Error;

/// Errors raised while decoding field elements
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HashError {
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    #[error("Invalid length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("Value is not a canonical field element: {0}")]
    NonCanonical(String),
}
