//! Ledger Core - State Transitions
//!
//! Composes the accumulator, nullifier set, rate governor, denomination set,
//! asset registry and locked balances into the four mutating operations:
//! register-asset, shield, private transfer and unshield (plus pause/unpause).
//!
//! Every operation runs in two phases. The check phase evaluates every
//! precondition without touching state. The effect phase then commits; the
//! only step in it that can fail is the custody call, and a custody failure
//! undoes the effects already applied by the same operation before the
//! error is returned.

use std::sync::Arc;

use cloak_hash::{FieldElement, HashOracle};
use tracing::{debug, info, warn};

use crate::access::AccessControl;
use crate::accumulator::Accumulator;
use crate::asset::{
    derive_asset_id, AssetHandle, AssetId, AssetRegistry, LockedBalances, NATIVE_ASSET_ID,
};
use crate::config::PoolConfig;
use crate::custody::Custody;
use crate::denomination::DenominationValidator;
use crate::errors::{PoolError, PoolResult};
use crate::events::{PoolEvent, ShieldReceipt, TransferReceipt, UnshieldReceipt};
use crate::nullifier::NullifierSet;
use crate::rate::{Direction, RateGovernor};
use crate::snapshot::LedgerSnapshot;
use crate::types::{Address, Amount, CallContext, PoolVariant, Proof, StealthPayload, WindowId};
use crate::verifier::{shield_inputs, transfer_inputs, unshield_inputs, Circuit, VerifierSet};

/// External collaborators a ledger calls out to
#[derive(Clone)]
pub struct Collaborators {
    pub verifiers: VerifierSet,
    pub custody: Arc<dyn Custody>,
    pub access: Arc<dyn AccessControl>,
}

impl Collaborators {
    pub fn new(
        verifiers: VerifierSet,
        custody: Arc<dyn Custody>,
        access: Arc<dyn AccessControl>,
    ) -> Self {
        Self {
            verifiers,
            custody,
            access,
        }
    }
}

/// Single-writer ledger state machine
pub struct LedgerCore {
    variant: PoolVariant,
    accumulator: Accumulator,
    nullifiers: NullifierSet,
    rate: RateGovernor,
    denominations: DenominationValidator,
    assets: AssetRegistry,
    balances: LockedBalances,
    note_count: u64,
    paused: bool,
    collaborators: Collaborators,
    outbox: Vec<PoolEvent>,
}

impl LedgerCore {
    /// Create an empty pool with only the native asset registered
    pub fn new(
        config: &PoolConfig,
        oracle: Arc<dyn HashOracle>,
        collaborators: Collaborators,
    ) -> PoolResult<Self> {
        config.validate()?;

        let accumulator = Accumulator::new(config.tree_depth, oracle)?;
        info!(
            "Created {} pool (depth {}, empty root {})",
            config.variant,
            config.tree_depth,
            accumulator.last_root()
        );

        Ok(Self {
            variant: config.variant,
            accumulator,
            nullifiers: NullifierSet::new(),
            rate: RateGovernor::new(config.inflow_ceiling, config.outflow_ceiling),
            denominations: config.denomination_validator()?,
            assets: AssetRegistry::new(),
            balances: LockedBalances::new(),
            note_count: 0,
            paused: false,
            collaborators,
            outbox: Vec::new(),
        })
    }

    // ------------------------------------------------------------------
    // Admin operations
    // ------------------------------------------------------------------

    /// Register an external token; returns its derived asset id
    pub fn register_asset(&mut self, ctx: &CallContext, token: Address) -> PoolResult<AssetId> {
        self.apply_register_asset(ctx, token)
            .map_err(|e| rejected("register_asset", ctx, e))
    }

    fn apply_register_asset(&mut self, ctx: &CallContext, token: Address) -> PoolResult<AssetId> {
        self.ensure_active()?;
        self.ensure_admin(&ctx.caller)?;
        let asset_id = self.assets.register(token)?;

        info!("Registered asset {} for token {}", asset_id, token);
        self.outbox.push(PoolEvent::AssetRegistered {
            asset_id,
            handle: AssetHandle::External(token),
        });
        Ok(asset_id)
    }

    pub fn pause(&mut self, ctx: &CallContext) -> PoolResult<()> {
        self.set_paused(ctx, true).map_err(|e| rejected("pause", ctx, e))
    }

    pub fn unpause(&mut self, ctx: &CallContext) -> PoolResult<()> {
        self.set_paused(ctx, false).map_err(|e| rejected("unpause", ctx, e))
    }

    fn set_paused(&mut self, ctx: &CallContext, paused: bool) -> PoolResult<()> {
        self.ensure_admin(&ctx.caller)?;
        if self.paused == paused {
            return Err(PoolError::InvalidPauseState(if paused { "paused" } else { "active" }));
        }

        self.paused = paused;
        if paused {
            info!("Pool paused by {}", ctx.caller);
            self.outbox.push(PoolEvent::Paused { by: ctx.caller });
        } else {
            info!("Pool unpaused by {}", ctx.caller);
            self.outbox.push(PoolEvent::Unpaused { by: ctx.caller });
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Value operations
    // ------------------------------------------------------------------

    /// Deposit `amount` of `asset_id` behind a new commitment
    pub fn shield(
        &mut self,
        ctx: &CallContext,
        proof: &Proof,
        commitment: FieldElement,
        amount: Amount,
        asset_id: AssetId,
        payload: Option<StealthPayload>,
    ) -> PoolResult<ShieldReceipt> {
        self.apply_shield(ctx, proof, commitment, amount, asset_id, payload)
            .map_err(|e| rejected("shield", ctx, e))
    }

    fn apply_shield(
        &mut self,
        ctx: &CallContext,
        proof: &Proof,
        commitment: FieldElement,
        amount: Amount,
        asset_id: AssetId,
        payload: Option<StealthPayload>,
    ) -> PoolResult<ShieldReceipt> {
        self.ensure_active()?;
        if amount == 0 {
            return Err(PoolError::ZeroAmount);
        }
        self.denominations.index_of(amount)?;
        let handle = self.assets.handle(&asset_id)?;
        self.check_payload(payload.as_ref())?;
        self.ensure_capacity()?;
        self.rate.check(Direction::Inflow, amount, ctx.window)?;
        self.ensure_proof(
            Circuit::Shield,
            proof,
            &shield_inputs(amount, asset_id, commitment),
        )?;

        self.rate.check_and_consume(Direction::Inflow, amount, ctx.window)?;
        if let Err(e) = self.collaborators.custody.pull(&handle, &ctx.caller, amount) {
            self.rate.release_in_flight(Direction::Inflow, amount, ctx.window);
            return Err(e.into());
        }

        let leaf_index = self.accumulator.insert(commitment)?;
        self.balances.credit(asset_id, amount);
        self.note_count += 1;

        let root = self.accumulator.last_root();
        debug!(leaf_index, root = %root, asset = %asset_id, "Shielded note");
        self.outbox.push(PoolEvent::Shielded {
            commitment,
            leaf_index,
            asset_id,
            timestamp: ctx.timestamp,
            payload,
        });

        Ok(ShieldReceipt { leaf_index, root })
    }

    /// Spend a note and create a new one; no value leaves the pool
    pub fn private_transfer(
        &mut self,
        ctx: &CallContext,
        proof: &Proof,
        nullifier_hash: FieldElement,
        new_commitment: FieldElement,
        root: FieldElement,
        asset_id: AssetId,
    ) -> PoolResult<TransferReceipt> {
        self.apply_transfer(ctx, proof, nullifier_hash, new_commitment, root, asset_id)
            .map_err(|e| rejected("private_transfer", ctx, e))
    }

    fn apply_transfer(
        &mut self,
        ctx: &CallContext,
        proof: &Proof,
        nullifier_hash: FieldElement,
        new_commitment: FieldElement,
        root: FieldElement,
        asset_id: AssetId,
    ) -> PoolResult<TransferReceipt> {
        self.ensure_active()?;
        self.ensure_known_root(&root)?;
        self.ensure_unspent(&nullifier_hash)?;
        self.ensure_capacity()?;
        self.ensure_proof(
            Circuit::Transfer,
            proof,
            &transfer_inputs(root, nullifier_hash, new_commitment, asset_id),
        )?;

        self.nullifiers.mark_spent(nullifier_hash)?;
        let leaf_index = self.accumulator.insert(new_commitment)?;
        self.note_count += 1;

        let new_root = self.accumulator.last_root();
        debug!(leaf_index, root = %new_root, nullifier = %nullifier_hash, "Transferred note");
        self.outbox.push(PoolEvent::Transferred {
            nullifier_hash,
            new_commitment,
            leaf_index,
            timestamp: ctx.timestamp,
        });

        Ok(TransferReceipt {
            leaf_index,
            root: new_root,
        })
    }

    /// Spend a note and pay its value out to `recipient`
    #[allow(clippy::too_many_arguments)]
    pub fn unshield(
        &mut self,
        ctx: &CallContext,
        proof: &Proof,
        nullifier_hash: FieldElement,
        amount: Amount,
        asset_id: AssetId,
        recipient: Address,
        root: FieldElement,
    ) -> PoolResult<UnshieldReceipt> {
        self.apply_unshield(ctx, proof, nullifier_hash, amount, asset_id, recipient, root)
            .map_err(|e| rejected("unshield", ctx, e))
    }

    #[allow(clippy::too_many_arguments)]
    fn apply_unshield(
        &mut self,
        ctx: &CallContext,
        proof: &Proof,
        nullifier_hash: FieldElement,
        amount: Amount,
        asset_id: AssetId,
        recipient: Address,
        root: FieldElement,
    ) -> PoolResult<UnshieldReceipt> {
        self.ensure_active()?;
        self.ensure_known_root(&root)?;
        self.ensure_unspent(&nullifier_hash)?;
        self.denominations.index_of(amount)?;
        let handle = self.assets.handle(&asset_id)?;
        if recipient.is_null() {
            return Err(PoolError::InvalidRecipient);
        }
        self.rate.check(Direction::Outflow, amount, ctx.window)?;
        self.ensure_proof(
            Circuit::Unshield,
            proof,
            &unshield_inputs(root, nullifier_hash, amount, asset_id, recipient),
        )?;

        self.rate.check_and_consume(Direction::Outflow, amount, ctx.window)?;
        self.nullifiers.mark_spent(nullifier_hash)?;
        let locked_before = self.balances.debit(asset_id, amount);

        if let Err(e) = self.collaborators.custody.push(&handle, &recipient, amount) {
            self.balances.restore_in_flight(asset_id, locked_before);
            self.nullifiers.revert_in_flight(&nullifier_hash);
            self.rate.release_in_flight(Direction::Outflow, amount, ctx.window);
            return Err(e.into());
        }

        debug!(nullifier = %nullifier_hash, asset = %asset_id, recipient = %recipient, "Unshielded note");
        self.outbox.push(PoolEvent::Unshielded {
            nullifier_hash,
            asset_id,
            recipient,
            timestamp: ctx.timestamp,
        });

        Ok(UnshieldReceipt {
            nullifier_hash,
            recipient,
        })
    }

    // ------------------------------------------------------------------
    // Preconditions
    // ------------------------------------------------------------------

    fn ensure_active(&self) -> PoolResult<()> {
        if self.paused {
            return Err(PoolError::Paused);
        }
        Ok(())
    }

    fn ensure_admin(&self, caller: &Address) -> PoolResult<()> {
        if !self.collaborators.access.is_admin(caller) {
            return Err(PoolError::NotAdmin(*caller));
        }
        Ok(())
    }

    fn ensure_capacity(&self) -> PoolResult<()> {
        if self.accumulator.is_full() {
            return Err(PoolError::CapacityExceeded {
                capacity: self.accumulator.capacity(),
            });
        }
        Ok(())
    }

    fn ensure_known_root(&self, root: &FieldElement) -> PoolResult<()> {
        if !self.accumulator.is_known_root(root) {
            return Err(PoolError::UnknownRoot(*root));
        }
        Ok(())
    }

    fn ensure_unspent(&self, nullifier_hash: &FieldElement) -> PoolResult<()> {
        if self.nullifiers.is_spent(nullifier_hash) {
            return Err(PoolError::AlreadySpent(*nullifier_hash));
        }
        Ok(())
    }

    fn check_payload(&self, payload: Option<&StealthPayload>) -> PoolResult<()> {
        match (self.variant, payload) {
            (PoolVariant::Stealth, None) => Err(PoolError::MissingStealthPayload),
            (PoolVariant::Plain, Some(_)) => Err(PoolError::UnexpectedStealthPayload),
            _ => Ok(()),
        }
    }

    fn ensure_proof(&self, circuit: Circuit, proof: &Proof, inputs: &[FieldElement]) -> PoolResult<()> {
        if !self.collaborators.verifiers.verify(circuit, proof, inputs) {
            return Err(PoolError::InvalidProof(circuit));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn variant(&self) -> PoolVariant {
        self.variant
    }

    pub fn is_known_root(&self, root: &FieldElement) -> bool {
        self.accumulator.is_known_root(root)
    }

    pub fn last_root(&self) -> FieldElement {
        self.accumulator.last_root()
    }

    pub fn is_spent(&self, nullifier_hash: &FieldElement) -> bool {
        self.nullifiers.is_spent(nullifier_hash)
    }

    pub fn is_registered(&self, asset_id: &AssetId) -> bool {
        self.assets.is_registered(asset_id)
    }

    pub fn balance_of(&self, asset_id: &AssetId) -> Amount {
        self.balances.balance_of(asset_id)
    }

    pub fn note_count(&self) -> u64 {
        self.note_count
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn rate_consumed(&self, direction: Direction, window: WindowId) -> Amount {
        self.rate.consumed(direction, window)
    }

    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    pub fn denominations(&self) -> &DenominationValidator {
        &self.denominations
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<PoolEvent> {
        std::mem::take(&mut self.outbox)
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    pub fn snapshot(&self) -> LedgerSnapshot {
        let mut nullifiers: Vec<FieldElement> = self.nullifiers.iter().copied().collect();
        nullifiers.sort();

        let mut assets: Vec<(AssetId, AssetHandle)> =
            self.assets.iter().map(|(id, handle)| (*id, *handle)).collect();
        assets.sort();

        let mut balances: Vec<(AssetId, Amount)> =
            self.balances.iter().map(|(id, amount)| (*id, *amount)).collect();
        balances.sort();

        LedgerSnapshot {
            version: LedgerSnapshot::VERSION,
            variant: self.variant,
            accumulator: self.accumulator.snapshot(),
            nullifiers,
            rate: self.rate.snapshot(),
            denominations: self.denominations.amounts().to_vec(),
            assets,
            balances,
            note_count: self.note_count,
            paused: self.paused,
        }
    }

    /// Rebuild a ledger from a snapshot; the event outbox starts empty
    pub fn restore(
        snapshot: LedgerSnapshot,
        oracle: Arc<dyn HashOracle>,
        collaborators: Collaborators,
    ) -> PoolResult<Self> {
        if snapshot.version != LedgerSnapshot::VERSION {
            return Err(PoolError::CorruptSnapshot(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }

        let accumulator = Accumulator::from_snapshot(snapshot.accumulator, oracle)?;
        if snapshot.note_count != accumulator.next_leaf_index() {
            return Err(PoolError::CorruptSnapshot(format!(
                "note count {} does not match {} leaves",
                snapshot.note_count,
                accumulator.next_leaf_index()
            )));
        }

        let denominations = DenominationValidator::new(snapshot.denominations)
            .map_err(|e| PoolError::CorruptSnapshot(e.to_string()))?;

        let nullifier_count = snapshot.nullifiers.len();
        let nullifiers: NullifierSet = snapshot.nullifiers.into_iter().collect();
        if nullifiers.len() != nullifier_count {
            return Err(PoolError::CorruptSnapshot("duplicate nullifier".into()));
        }

        let assets = AssetRegistry::from_entries(snapshot.assets);
        for (asset_id, handle) in assets.iter() {
            let expected = match handle {
                AssetHandle::Native => NATIVE_ASSET_ID,
                AssetHandle::External(token) => derive_asset_id(token),
            };
            if *asset_id != expected {
                return Err(PoolError::CorruptSnapshot(format!(
                    "asset id {} does not belong to {}",
                    asset_id, handle
                )));
            }
        }
        if let Some((asset_id, _)) = snapshot
            .balances
            .iter()
            .find(|(asset_id, _)| !assets.is_registered(asset_id))
        {
            return Err(PoolError::CorruptSnapshot(format!(
                "locked balance for unregistered asset {}",
                asset_id
            )));
        }

        info!(
            "Restored {} pool with {} notes and {} spent nullifiers",
            snapshot.variant,
            snapshot.note_count,
            nullifiers.len()
        );

        Ok(Self {
            variant: snapshot.variant,
            accumulator,
            nullifiers,
            rate: RateGovernor::from_snapshot(snapshot.rate),
            denominations,
            assets,
            balances: snapshot.balances.into_iter().collect(),
            note_count: snapshot.note_count,
            paused: snapshot.paused,
            collaborators,
            outbox: Vec::new(),
        })
    }
}

impl std::fmt::Debug for LedgerCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerCore")
            .field("variant", &self.variant)
            .field("last_root", &self.accumulator.last_root())
            .field("note_count", &self.note_count)
            .field("spent", &self.nullifiers.len())
            .field("paused", &self.paused)
            .finish_non_exhaustive()
    }
}

fn rejected(operation: &'static str, ctx: &CallContext, err: PoolError) -> PoolError {
    warn!(
        operation,
        caller = %ctx.caller,
        window = ctx.window,
        kind = ?err.kind(),
        "Rejected: {}",
        err
    );
    err
}
