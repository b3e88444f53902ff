//! Shielded Pool Ledger Core
//!
//! A privacy-preserving value ledger: commitments go into an append-only
//! accumulator, spends reveal nullifiers that can be used only once, and a
//! per-window rate governor caps how much value may enter or leave.
//!
//! # Key Properties
//! - **Opaque values**: commitments and nullifiers are field elements the
//!   ledger never interprets; it only enforces membership and uniqueness
//! - **Bounded root history**: proofs against any of the last 100 roots verify
//! - **Check before effect**: every precondition runs before any state moves
//! - **Single writer**: [`ShieldedPool`] serializes submissions and refuses
//!   re-entrant calls
//!
//! # Architecture
//! ```text
//!                 ┌────────────────────────┐
//!   host ───────▶ │      ShieldedPool      │  ReentrantMutex<RefCell<_>>
//!                 └───────────┬────────────┘
//!                             ▼
//!                 ┌────────────────────────┐      ┌──────────────┐
//!                 │       LedgerCore       │ ───▶ │  VerifierSet │
//!                 ├────────────────────────┤      ├──────────────┤
//!                 │ Accumulator            │ ───▶ │  Custody     │
//!                 │ NullifierSet           │      ├──────────────┤
//!                 │ RateGovernor           │ ───▶ │ AccessControl│
//!                 │ DenominationValidator  │      └──────────────┘
//!                 │ AssetRegistry/Balances │
//!                 └────────────────────────┘
//! ```

pub mod access;
pub mod accumulator;
pub mod asset;
pub mod config;
pub mod custody;
pub mod denomination;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod nullifier;
pub mod pool;
pub mod rate;
pub mod snapshot;
pub mod types;
pub mod verifier;

pub use access::{AccessControl, AdminList};
pub use accumulator::{
    zero_leaf, Accumulator, AccumulatorSnapshot, DEFAULT_TREE_DEPTH, MAX_TREE_DEPTH,
    ROOT_HISTORY_SIZE,
};
pub use asset::{
    derive_asset_id, AssetHandle, AssetId, AssetRegistry, LockedBalances, NATIVE_ASSET_ID,
};
pub use config::PoolConfig;
pub use custody::{Custody, CustodyError, InMemoryCustody};
pub use denomination::{DenominationValidator, CANONICAL_DENOMINATIONS, TOKEN_UNIT};
pub use errors::{ErrorKind, PoolError, PoolResult};
pub use events::{PoolEvent, ShieldReceipt, TransferReceipt, UnshieldReceipt};
pub use ledger::{Collaborators, LedgerCore};
pub use nullifier::NullifierSet;
pub use pool::ShieldedPool;
pub use rate::{Direction, RateGovernor, RateSnapshot, RateWindow};
pub use snapshot::{load_snapshot, save_snapshot, LedgerSnapshot, SnapshotError};
pub use types::{Address, Amount, CallContext, PoolVariant, Proof, StealthPayload, WindowId};
pub use verifier::{
    shield_inputs, transfer_inputs, unshield_inputs, AcceptAllVerifier, Circuit, DigestVerifier,
    ProofVerifier, VerifierSet,
};
