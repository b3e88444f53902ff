//! CLOAK: Shielded Value Ledger
//!
//! This is the root crate that re-exports the CLOAK components for integration
//! testing and provides unified access to the ledger primitives.
//!
//! ## Architecture Overview
//!
//! CLOAK keeps value in a shielded pool. Deposits become commitments in an
//! append-only accumulator, spends reveal one-time nullifiers, and a rate
//! governor caps per-window flow in and out:
//!
//! - **Incremental Accumulator**: O(depth) insert with a 100-root history
//! - **Nullifier Set**: permanent double-spend prevention
//! - **Rate Governor**: per-window inflow and outflow ceilings
//! - **Fixed Denominations**: amounts drawn from a small public set
//! - **Guarded Pool Handle**: single writer, re-entrant calls refused
//!
//! ## Crate Organization
//!
//! - `cloak-hash`: BN254 field elements, Poseidon sponge, hash oracles
//! - `cloak-pool`: accumulator, nullifiers, rate governor, ledger core

// Re-export all crates for integration testing
pub use cloak_hash as hash;
pub use cloak_pool as pool;

/// CLOAK protocol version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Protocol constants
pub mod config {
    pub use cloak_pool::{
        CANONICAL_DENOMINATIONS, DEFAULT_TREE_DEPTH, MAX_TREE_DEPTH, ROOT_HISTORY_SIZE, TOKEN_UNIT,
    };

    /// Leaves an accumulator of `depth` can hold; `None` outside `1..=MAX_TREE_DEPTH`
    pub fn capacity(depth: usize) -> Option<u64> {
        if depth == 0 || depth > MAX_TREE_DEPTH {
            return None;
        }
        Some(1u64 << depth)
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use cloak_hash::{Blake3Oracle, FieldElement, HashOracle, PoseidonOracle};
    pub use cloak_pool::{
        Accumulator, AdminList, Address, Amount, AssetHandle, AssetId, CallContext, Circuit,
        Collaborators, Custody, CustodyError, DenominationValidator, Direction, ErrorKind,
        InMemoryCustody, LedgerCore, NullifierSet, PoolConfig, PoolError, PoolEvent, PoolResult,
        PoolVariant, Proof, RateGovernor, ShieldedPool, StealthPayload, VerifierSet,
        NATIVE_ASSET_ID,
    };
}
