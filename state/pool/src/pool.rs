//! Shielded Pool - the host-facing handle
//!
//! Wraps a [`LedgerCore`] so that submissions from different threads are
//! serialized, while a call that arrives on the thread already running an
//! operation (a collaborator calling back into the pool) is refused with
//! [`PoolError::Reentrancy`] instead of deadlocking.

use std::cell::RefCell;
use std::sync::Arc;

use cloak_hash::{FieldElement, HashOracle};
use parking_lot::ReentrantMutex;
use tracing::warn;

use crate::asset::AssetId;
use crate::config::PoolConfig;
use crate::errors::{PoolError, PoolResult};
use crate::events::{PoolEvent, ShieldReceipt, TransferReceipt, UnshieldReceipt};
use crate::ledger::{Collaborators, LedgerCore};
use crate::rate::Direction;
use crate::snapshot::LedgerSnapshot;
use crate::types::{Address, Amount, CallContext, PoolVariant, Proof, StealthPayload, WindowId};

/// Thread-safe, re-entrancy-guarded pool
pub struct ShieldedPool {
    core: ReentrantMutex<RefCell<LedgerCore>>,
}

impl ShieldedPool {
    pub fn new(core: LedgerCore) -> Self {
        Self {
            core: ReentrantMutex::new(RefCell::new(core)),
        }
    }

    pub fn from_config(
        config: &PoolConfig,
        oracle: Arc<dyn HashOracle>,
        collaborators: Collaborators,
    ) -> PoolResult<Self> {
        LedgerCore::new(config, oracle, collaborators).map(Self::new)
    }

    pub fn restore(
        snapshot: LedgerSnapshot,
        oracle: Arc<dyn HashOracle>,
        collaborators: Collaborators,
    ) -> PoolResult<Self> {
        LedgerCore::restore(snapshot, oracle, collaborators).map(Self::new)
    }

    /// Run a mutating operation with exclusive access to the core
    fn write<T>(&self, op: impl FnOnce(&mut LedgerCore) -> PoolResult<T>) -> PoolResult<T> {
        let guard = self.core.lock();
        let mut core = guard.try_borrow_mut().map_err(|_| {
            warn!("Rejected reentrant call while an operation is in flight");
            PoolError::Reentrancy
        })?;
        op(&mut core)
    }

    fn read<T>(&self, query: impl FnOnce(&LedgerCore) -> T) -> PoolResult<T> {
        let guard = self.core.lock();
        let core = guard.try_borrow().map_err(|_| PoolError::Reentrancy)?;
        Ok(query(&core))
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    pub fn register_asset(&self, ctx: &CallContext, token: Address) -> PoolResult<AssetId> {
        self.write(|core| core.register_asset(ctx, token))
    }

    pub fn shield(
        &self,
        ctx: &CallContext,
        proof: &Proof,
        commitment: FieldElement,
        amount: Amount,
        asset_id: AssetId,
        payload: Option<StealthPayload>,
    ) -> PoolResult<ShieldReceipt> {
        self.write(|core| core.shield(ctx, proof, commitment, amount, asset_id, payload))
    }

    pub fn private_transfer(
        &self,
        ctx: &CallContext,
        proof: &Proof,
        nullifier_hash: FieldElement,
        new_commitment: FieldElement,
        root: FieldElement,
        asset_id: AssetId,
    ) -> PoolResult<TransferReceipt> {
        self.write(|core| {
            core.private_transfer(ctx, proof, nullifier_hash, new_commitment, root, asset_id)
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn unshield(
        &self,
        ctx: &CallContext,
        proof: &Proof,
        nullifier_hash: FieldElement,
        amount: Amount,
        asset_id: AssetId,
        recipient: Address,
        root: FieldElement,
    ) -> PoolResult<UnshieldReceipt> {
        self.write(|core| {
            core.unshield(ctx, proof, nullifier_hash, amount, asset_id, recipient, root)
        })
    }

    pub fn pause(&self, ctx: &CallContext) -> PoolResult<()> {
        self.write(|core| core.pause(ctx))
    }

    pub fn unpause(&self, ctx: &CallContext) -> PoolResult<()> {
        self.write(|core| core.unpause(ctx))
    }

    pub fn drain_events(&self) -> PoolResult<Vec<PoolEvent>> {
        self.write(|core| Ok(core.drain_events()))
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn variant(&self) -> PoolResult<PoolVariant> {
        self.read(|core| core.variant())
    }

    pub fn is_known_root(&self, root: &FieldElement) -> PoolResult<bool> {
        self.read(|core| core.is_known_root(root))
    }

    pub fn last_root(&self) -> PoolResult<FieldElement> {
        self.read(|core| core.last_root())
    }

    pub fn is_spent(&self, nullifier_hash: &FieldElement) -> PoolResult<bool> {
        self.read(|core| core.is_spent(nullifier_hash))
    }

    pub fn is_registered(&self, asset_id: &AssetId) -> PoolResult<bool> {
        self.read(|core| core.is_registered(asset_id))
    }

    pub fn balance_of(&self, asset_id: &AssetId) -> PoolResult<Amount> {
        self.read(|core| core.balance_of(asset_id))
    }

    pub fn note_count(&self) -> PoolResult<u64> {
        self.read(|core| core.note_count())
    }

    pub fn is_paused(&self) -> PoolResult<bool> {
        self.read(|core| core.is_paused())
    }

    pub fn rate_consumed(&self, direction: Direction, window: WindowId) -> PoolResult<Amount> {
        self.read(|core| core.rate_consumed(direction, window))
    }

    pub fn snapshot(&self) -> PoolResult<LedgerSnapshot> {
        self.read(|core| core.snapshot())
    }
}

impl std::fmt::Debug for ShieldedPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.core.lock();
        let result = match guard.try_borrow() {
            Ok(core) => f.debug_tuple("ShieldedPool").field(&*core).finish(),
            Err(_) => f.write_str("ShieldedPool(<in flight>)"),
        };
        result
    }
}
