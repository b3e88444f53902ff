//! Error types for shielded pool operations

use cloak_hash::FieldElement;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::custody::CustodyError;
use crate::rate::Direction;
use crate::types::{Address, Amount};
use crate::verifier::Circuit;

/// Result type for pool operations
pub type PoolResult<T> = Result<T, PoolError>;

/// Coarse classification of a [`PoolError`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Malformed or disallowed input
    Validation,
    /// Violates accumulator or nullifier invariants
    Integrity,
    /// Caller or proof is not authorized, or the pool refuses calls
    Authorization,
    /// Window ceiling would be exceeded
    RateLimit,
    /// External asset transfer failed
    Custody,
}

/// Errors that can occur during pool operations
///
/// Every variant aborts the operation with no state change.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    // Validation errors
    #[error("Amount must be non-zero")]
    ZeroAmount,

    #[error("Amount {0} is not an allowed denomination")]
    InvalidDenomination(Amount),

    #[error("Recipient must be a non-null address")]
    InvalidRecipient,

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid asset identifier: {0}")]
    InvalidAssetId(String),

    #[error("Asset not registered: {0}")]
    UnregisteredAsset(FieldElement),

    #[error("Asset already registered: {0}")]
    AlreadyRegistered(FieldElement),

    #[error("Stealth pool requires an encrypted note payload")]
    MissingStealthPayload,

    #[error("Plain pool does not accept a note payload")]
    UnexpectedStealthPayload,

    #[error("Pool is already {0}")]
    InvalidPauseState(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Integrity errors
    #[error("Unknown merkle root: {0}")]
    UnknownRoot(FieldElement),

    #[error("Nullifier already spent: {0}")]
    AlreadySpent(FieldElement),

    #[error("Accumulator is full ({capacity} leaves)")]
    CapacityExceeded { capacity: u64 },

    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    // Authorization errors
    #[error("Invalid {0} proof")]
    InvalidProof(Circuit),

    #[error("Pool is paused")]
    Paused,

    #[error("Caller {0} is not an administrator")]
    NotAdmin(Address),

    #[error("Reentrant call rejected while an operation is in flight")]
    Reentrancy,

    // Rate limiting
    #[error("{direction} rate limit exceeded: {attempted} > {ceiling}")]
    RateLimitExceeded {
        direction: Direction,
        attempted: Amount,
        ceiling: Amount,
    },

    // Custody
    #[error("Custody transfer failed: {0}")]
    Custody(#[from] CustodyError),
}

impl PoolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PoolError::ZeroAmount
            | PoolError::InvalidDenomination(_)
            | PoolError::InvalidRecipient
            | PoolError::InvalidAddress(_)
            | PoolError::InvalidAssetId(_)
            | PoolError::UnregisteredAsset(_)
            | PoolError::AlreadyRegistered(_)
            | PoolError::MissingStealthPayload
            | PoolError::UnexpectedStealthPayload
            | PoolError::InvalidPauseState(_)
            | PoolError::InvalidConfig(_) => ErrorKind::Validation,

            PoolError::UnknownRoot(_)
            | PoolError::AlreadySpent(_)
            | PoolError::CapacityExceeded { .. }
            | PoolError::CorruptSnapshot(_) => ErrorKind::Integrity,

            PoolError::InvalidProof(_)
            | PoolError::Paused
            | PoolError::NotAdmin(_)
            | PoolError::Reentrancy => ErrorKind::Authorization,

            PoolError::RateLimitExceeded { .. } => ErrorKind::RateLimit,

            PoolError::Custody(_) => ErrorKind::Custody,
        }
    }
}
