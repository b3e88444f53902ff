//! Pool configuration
//!
//! Amounts are serialized as decimal strings so the config survives TOML's
//! 64-bit integers.

use serde::{Deserialize, Serialize};

use crate::accumulator::{DEFAULT_TREE_DEPTH, MAX_TREE_DEPTH};
use crate::denomination::{DenominationValidator, CANONICAL_DENOMINATIONS, TOKEN_UNIT};
use crate::errors::{PoolError, PoolResult};
use crate::types::{amount_string, Amount, PoolVariant};

/// Parameters fixed at pool creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Commitment scheme served by this pool
    pub variant: PoolVariant,

    /// Accumulator depth (capacity `2^tree_depth`)
    pub tree_depth: usize,

    /// Per-window ceiling on shielded value
    #[serde(with = "amount_string")]
    pub inflow_ceiling: Amount,

    /// Per-window ceiling on unshielded value
    #[serde(with = "amount_string")]
    pub outflow_ceiling: Amount,

    /// Allowed shield/unshield amounts, ascending
    #[serde(with = "amount_string::list")]
    pub denominations: Vec<Amount>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl PoolConfig {
    /// Generous ceilings for local development
    pub fn local() -> Self {
        Self {
            variant: PoolVariant::Plain,
            tree_depth: DEFAULT_TREE_DEPTH,
            inflow_ceiling: 1_000_000 * TOKEN_UNIT,
            outflow_ceiling: 1_000_000 * TOKEN_UNIT,
            denominations: CANONICAL_DENOMINATIONS.to_vec(),
        }
    }

    pub fn production() -> Self {
        Self {
            variant: PoolVariant::Plain,
            tree_depth: DEFAULT_TREE_DEPTH,
            inflow_ceiling: 50_000 * TOKEN_UNIT,
            outflow_ceiling: 25_000 * TOKEN_UNIT,
            denominations: CANONICAL_DENOMINATIONS.to_vec(),
        }
    }

    pub fn with_variant(mut self, variant: PoolVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn validate(&self) -> PoolResult<()> {
        if self.tree_depth == 0 || self.tree_depth > MAX_TREE_DEPTH {
            return Err(PoolError::InvalidConfig(format!(
                "tree_depth must be in 1..={}",
                MAX_TREE_DEPTH
            )));
        }
        if self.inflow_ceiling == 0 || self.outflow_ceiling == 0 {
            return Err(PoolError::InvalidConfig("rate ceilings must be non-zero".into()));
        }
        self.denomination_validator()?;
        Ok(())
    }

    pub fn denomination_validator(&self) -> PoolResult<DenominationValidator> {
        DenominationValidator::new(self.denominations.clone())
    }
}
