//! Fixed denominations
//!
//! Amounts entering or leaving the pool must be one of a small ascending set,
//! so the amount itself reveals little about the note.

use crate::errors::{PoolError, PoolResult};
use crate::types::Amount;

/// Base units per whole token (18 decimals)
pub const TOKEN_UNIT: Amount = 1_000_000_000_000_000_000;

/// 0.1, 1, 10, 100, 1 000 and 10 000 tokens
pub const CANONICAL_DENOMINATIONS: [Amount; 6] = [
    TOKEN_UNIT / 10,
    TOKEN_UNIT,
    10 * TOKEN_UNIT,
    100 * TOKEN_UNIT,
    1_000 * TOKEN_UNIT,
    10_000 * TOKEN_UNIT,
];

/// Exact-membership check over an ascending amount list
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DenominationValidator {
    amounts: Vec<Amount>,
}

impl DenominationValidator {
    /// Build from a custom list; must be non-empty, non-zero and strictly ascending
    pub fn new(amounts: Vec<Amount>) -> PoolResult<Self> {
        if amounts.is_empty() {
            return Err(PoolError::InvalidConfig("denomination set is empty".into()));
        }
        if amounts[0] == 0 {
            return Err(PoolError::InvalidConfig("zero is not a denomination".into()));
        }
        if amounts.windows(2).any(|w| w[0] >= w[1]) {
            return Err(PoolError::InvalidConfig(
                "denominations must be strictly ascending".into(),
            ));
        }
        Ok(Self { amounts })
    }

    pub fn canonical() -> Self {
        Self {
            amounts: CANONICAL_DENOMINATIONS.to_vec(),
        }
    }

    pub fn is_valid(&self, amount: Amount) -> bool {
        self.amounts.binary_search(&amount).is_ok()
    }

    /// Ordinal of `amount` within the set
    pub fn index_of(&self, amount: Amount) -> PoolResult<usize> {
        self.amounts
            .binary_search(&amount)
            .map_err(|_| PoolError::InvalidDenomination(amount))
    }

    pub fn amounts(&self) -> &[Amount] {
        &self.amounts
    }
}

impl Default for DenominationValidator {
    fn default() -> Self {
        Self::canonical()
    }
}
