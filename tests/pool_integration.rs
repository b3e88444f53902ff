//! Integration Tests for the CLOAK Shielded Pool
//!
//! End-to-end flows through [`ShieldedPool`]:
//! - Shield / transfer / unshield scenarios
//! - Rate ceilings across windows and threads
//! - Rollback when custody fails
//! - Re-entrancy, pause switch and pool variants
//! - Snapshot persistence

use std::sync::{Arc, Weak};

use cloak::pool::{
    load_snapshot, save_snapshot, shield_inputs, transfer_inputs, unshield_inputs,
    ShieldReceipt, TransferReceipt, UnshieldReceipt, CANONICAL_DENOMINATIONS, TOKEN_UNIT,
};
use cloak::prelude::*;
use parking_lot::Mutex;

const UNIT: Amount = TOKEN_UNIT;

// =============================================================================
// HARNESS
// =============================================================================

fn admin() -> Address {
    Address::from_bytes([0xad; 20])
}

fn alice() -> Address {
    Address::from_bytes([0xa1; 20])
}

fn bob() -> Address {
    Address::from_bytes([0xb0; 20])
}

fn field(n: u64) -> FieldElement {
    FieldElement::from_u64(n)
}

fn test_config() -> PoolConfig {
    PoolConfig {
        variant: PoolVariant::Plain,
        tree_depth: 20,
        inflow_ceiling: 1_000 * UNIT,
        outflow_ceiling: 1_000 * UNIT,
        denominations: CANONICAL_DENOMINATIONS.to_vec(),
    }
}

struct Harness {
    pool: ShieldedPool,
    custody: Arc<InMemoryCustody>,
}

impl Harness {
    fn new(config: PoolConfig) -> Self {
        Self::with_oracle(config, Arc::new(Blake3Oracle))
    }

    fn with_oracle(config: PoolConfig, oracle: Arc<dyn HashOracle>) -> Self {
        let custody = Arc::new(InMemoryCustody::new());
        custody.fund(AssetHandle::Native, alice(), 1_000_000 * UNIT);
        let pool = ShieldedPool::from_config(&config, oracle, collaborators(&custody)).unwrap();
        Self { pool, custody }
    }

    fn shield(&self, window: u64, commitment: u64, amount: Amount) -> PoolResult<ShieldReceipt> {
        self.shield_asset(window, field(commitment), amount, NATIVE_ASSET_ID, None)
    }

    fn shield_asset(
        &self,
        window: u64,
        commitment: FieldElement,
        amount: Amount,
        asset_id: AssetId,
        payload: Option<StealthPayload>,
    ) -> PoolResult<ShieldReceipt> {
        let proof = Proof::digest(Circuit::Shield, &shield_inputs(amount, asset_id, commitment));
        self.pool.shield(
            &CallContext::new(alice(), window, 1_700_000_000),
            &proof,
            commitment,
            amount,
            asset_id,
            payload,
        )
    }

    fn transfer(&self, nullifier: u64, commitment: u64, root: FieldElement) -> PoolResult<TransferReceipt> {
        let (nullifier, commitment) = (field(nullifier), field(commitment));
        let proof = Proof::digest(
            Circuit::Transfer,
            &transfer_inputs(root, nullifier, commitment, NATIVE_ASSET_ID),
        );
        self.pool.private_transfer(
            &CallContext::new(alice(), 1, 0),
            &proof,
            nullifier,
            commitment,
            root,
            NATIVE_ASSET_ID,
        )
    }

    fn unshield(
        &self,
        window: u64,
        nullifier: u64,
        amount: Amount,
        recipient: Address,
        root: FieldElement,
    ) -> PoolResult<UnshieldReceipt> {
        let nullifier = field(nullifier);
        let proof = Proof::digest(
            Circuit::Unshield,
            &unshield_inputs(root, nullifier, amount, NATIVE_ASSET_ID, recipient),
        );
        self.pool.unshield(
            &CallContext::new(alice(), window, 0),
            &proof,
            nullifier,
            amount,
            NATIVE_ASSET_ID,
            recipient,
            root,
        )
    }

    fn root(&self) -> FieldElement {
        self.pool.last_root().unwrap()
    }
}

fn collaborators(custody: &Arc<InMemoryCustody>) -> Collaborators {
    Collaborators::new(
        VerifierSet::digest(),
        custody.clone(),
        Arc::new(AdminList::single(admin())),
    )
}

// =============================================================================
// SCENARIOS
// =============================================================================

mod scenario_tests {
    use super::*;

    #[test]
    fn test_scenario_a_first_shield() {
        let h = Harness::with_oracle(test_config(), Arc::new(PoseidonOracle::new()));
        let empty_root = h.root();

        let receipt = h.shield(1, 0xc0ffee, UNIT).unwrap();

        assert_eq!(receipt.leaf_index, 0);
        assert_ne!(receipt.root, empty_root);
        assert_eq!(receipt.root, h.root());
        assert_eq!(h.pool.balance_of(&NATIVE_ASSET_ID).unwrap(), UNIT);
        assert_eq!(h.pool.note_count().unwrap(), 1);
        assert!(h.pool.is_known_root(&empty_root).unwrap());
    }

    #[test]
    fn test_scenario_b_unshield_once() {
        let h = Harness::new(test_config());
        h.shield(1, 1, UNIT).unwrap();
        let root = h.root();

        h.unshield(1, 77, UNIT, bob(), root).unwrap();
        assert_eq!(h.custody.balance(&AssetHandle::Native, &bob()), UNIT);
        assert_eq!(h.pool.balance_of(&NATIVE_ASSET_ID).unwrap(), 0);

        let carol = Address::from_bytes([0xc0; 20]);
        let replay = h.unshield(1, 77, 10 * UNIT, carol, root).unwrap_err();
        assert_eq!(replay, PoolError::AlreadySpent(field(77)));
        assert_eq!(replay.kind(), ErrorKind::Integrity);
        assert_eq!(h.custody.balance(&AssetHandle::Native, &carol), 0);
    }

    #[test]
    fn test_scenario_c_inflow_ceiling() {
        let h = Harness::new(PoolConfig {
            inflow_ceiling: 3 * UNIT,
            ..test_config()
        });

        for i in 0..3 {
            h.shield(5, i, UNIT).unwrap();
        }
        let err = h.shield(5, 3, UNIT).unwrap_err();
        assert_eq!(
            err,
            PoolError::RateLimitExceeded {
                direction: Direction::Inflow,
                attempted: 4 * UNIT,
                ceiling: 3 * UNIT,
            }
        );

        assert_eq!(h.pool.note_count().unwrap(), 3);
        assert_eq!(h.pool.balance_of(&NATIVE_ASSET_ID).unwrap(), 3 * UNIT);
        assert_eq!(h.pool.rate_consumed(Direction::Inflow, 5).unwrap(), 3 * UNIT);

        // A new window starts from zero
        assert!(h.shield(6, 3, UNIT).is_ok());
    }

    #[test]
    fn test_shield_transfer_unshield_chain() {
        let h = Harness::new(test_config());
        h.shield(1, 1, 10 * UNIT).unwrap();

        let transfer = h.transfer(100, 2, h.root()).unwrap();
        assert_eq!(transfer.leaf_index, 1);
        assert_eq!(h.pool.balance_of(&NATIVE_ASSET_ID).unwrap(), 10 * UNIT);

        h.unshield(1, 101, 10 * UNIT, bob(), transfer.root).unwrap();
        assert_eq!(h.pool.note_count().unwrap(), 2);
        assert!(h.pool.is_spent(&field(100)).unwrap());
        assert!(h.pool.is_spent(&field(101)).unwrap());
    }

    #[test]
    fn test_wrong_public_inputs_rejected() {
        let h = Harness::new(test_config());
        h.shield(1, 1, UNIT).unwrap();
        let root = h.root();

        // Proof for bob presented with carol as recipient
        let nullifier = field(9);
        let proof = Proof::digest(
            Circuit::Unshield,
            &unshield_inputs(root, nullifier, UNIT, NATIVE_ASSET_ID, bob()),
        );
        let carol = Address::from_bytes([0xc0; 20]);
        let err = h
            .pool
            .unshield(&CallContext::new(carol, 1, 0), &proof, nullifier, UNIT, NATIVE_ASSET_ID, carol, root)
            .unwrap_err();

        assert_eq!(err, PoolError::InvalidProof(Circuit::Unshield));
        assert!(!h.pool.is_spent(&nullifier).unwrap());
        assert_eq!(h.pool.rate_consumed(Direction::Outflow, 1).unwrap(), 0);
    }

    #[test]
    fn test_outflow_ceiling() {
        let h = Harness::new(PoolConfig {
            outflow_ceiling: 2 * UNIT,
            ..test_config()
        });
        for i in 0..3 {
            h.shield(1, i, UNIT).unwrap();
        }
        let root = h.root();

        h.unshield(4, 10, UNIT, bob(), root).unwrap();
        h.unshield(4, 11, UNIT, bob(), root).unwrap();
        let err = h.unshield(4, 12, UNIT, bob(), root).unwrap_err();

        assert_eq!(
            err,
            PoolError::RateLimitExceeded {
                direction: Direction::Outflow,
                attempted: 3 * UNIT,
                ceiling: 2 * UNIT,
            }
        );
        assert!(!h.pool.is_spent(&field(12)).unwrap());
        assert_eq!(h.custody.balance(&AssetHandle::Native, &bob()), 2 * UNIT);
        assert_eq!(h.pool.balance_of(&NATIVE_ASSET_ID).unwrap(), UNIT);
        assert_eq!(h.pool.rate_consumed(Direction::Outflow, 4).unwrap(), 2 * UNIT);
    }

    #[test]
    fn test_transfer_with_invalid_proof() {
        let h = Harness::new(test_config());
        h.shield(1, 1, UNIT).unwrap();
        let root = h.root();

        // Proof bound to a different new commitment
        let nullifier = field(30);
        let proof = Proof::digest(
            Circuit::Transfer,
            &transfer_inputs(root, nullifier, field(31), NATIVE_ASSET_ID),
        );
        let err = h
            .pool
            .private_transfer(
                &CallContext::new(alice(), 1, 0),
                &proof,
                nullifier,
                field(32),
                root,
                NATIVE_ASSET_ID,
            )
            .unwrap_err();

        assert_eq!(err, PoolError::InvalidProof(Circuit::Transfer));
        assert!(!h.pool.is_spent(&nullifier).unwrap());
        assert_eq!(h.pool.note_count().unwrap(), 1);
        assert_eq!(h.root(), root);
    }
}

// =============================================================================
// ROOT HISTORY
// =============================================================================

mod root_history_tests {
    use super::*;

    #[test]
    fn test_root_evicted_after_history_window() {
        let h = Harness::new(test_config());
        h.shield(1, 0, UNIT).unwrap();
        let old_root = h.root();

        for i in 1..100 {
            h.shield(1, i, UNIT).unwrap();
        }
        assert!(h.pool.is_known_root(&old_root).unwrap());

        h.shield(2, 100, UNIT).unwrap();
        assert!(!h.pool.is_known_root(&old_root).unwrap());

        let err = h.unshield(1, 5, UNIT, bob(), old_root).unwrap_err();
        assert_eq!(err, PoolError::UnknownRoot(old_root));
    }

    #[test]
    fn test_zero_root_never_known() {
        let h = Harness::new(test_config());
        assert!(!h.pool.is_known_root(&FieldElement::ZERO).unwrap());
        assert_eq!(
            h.transfer(1, 2, FieldElement::ZERO),
            Err(PoolError::UnknownRoot(FieldElement::ZERO))
        );
    }
}

// =============================================================================
// ROLLBACK
// =============================================================================

mod rollback_tests {
    use super::*;

    #[test]
    fn test_failed_payout_leaves_state_untouched() {
        let h = Harness::new(test_config());
        h.shield(1, 1, UNIT).unwrap();
        let root = h.root();
        let snapshot = h.pool.snapshot().unwrap();
        h.pool.drain_events().unwrap();

        h.custody.freeze(bob());
        let err = h.unshield(1, 50, UNIT, bob(), root).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Custody);
        assert!(!h.pool.is_spent(&field(50)).unwrap());
        assert_eq!(h.pool.balance_of(&NATIVE_ASSET_ID).unwrap(), UNIT);
        assert_eq!(h.pool.rate_consumed(Direction::Outflow, 1).unwrap(), 0);
        assert_eq!(h.pool.snapshot().unwrap(), snapshot);
        assert!(h.pool.drain_events().unwrap().is_empty());
    }

    #[test]
    fn test_insufficient_deposit_funds() {
        let h = Harness::new(test_config());
        let broke = Address::from_bytes([0x0b; 20]);
        let commitment = field(1);
        let proof = Proof::digest(
            Circuit::Shield,
            &shield_inputs(UNIT, NATIVE_ASSET_ID, commitment),
        );

        let err = h
            .pool
            .shield(&CallContext::new(broke, 1, 0), &proof, commitment, UNIT, NATIVE_ASSET_ID, None)
            .unwrap_err();

        assert!(matches!(
            err,
            PoolError::Custody(CustodyError::InsufficientFunds { requested, .. }) if requested == UNIT
        ));
        assert_eq!(h.pool.note_count().unwrap(), 0);
        assert_eq!(h.pool.rate_consumed(Direction::Inflow, 1).unwrap(), 0);
    }

    #[test]
    fn test_failed_payout_of_unshielded_asset_restores_snapshot() {
        let h = Harness::new(test_config());
        let token = Address::from_bytes([0x07; 20]);
        let asset_id = h
            .pool
            .register_asset(&CallContext::new(admin(), 1, 0), token)
            .unwrap();
        h.pool.drain_events().unwrap();

        let root = h.root();
        let before = h.pool.snapshot().unwrap();
        assert!(before.balances.is_empty());

        let nullifier = field(70);
        let proof = Proof::digest(
            Circuit::Unshield,
            &unshield_inputs(root, nullifier, UNIT, asset_id, bob()),
        );
        let err = h
            .pool
            .unshield(&CallContext::new(alice(), 1, 0), &proof, nullifier, UNIT, asset_id, bob(), root)
            .unwrap_err();

        assert_eq!(
            err,
            PoolError::Custody(CustodyError::PoolUnderfunded {
                available: 0,
                requested: UNIT,
            })
        );
        assert_eq!(h.pool.snapshot().unwrap(), before);
        assert!(h.pool.drain_events().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_shield_proof_reported_before_custody() {
        let h = Harness::new(test_config());
        let broke = Address::from_bytes([0x0b; 20]);
        let commitment = field(1);

        let err = h
            .pool
            .shield(
                &CallContext::new(broke, 1, 0),
                &Proof::default(),
                commitment,
                UNIT,
                NATIVE_ASSET_ID,
                None,
            )
            .unwrap_err();

        assert_eq!(err, PoolError::InvalidProof(Circuit::Shield));
        assert_eq!(h.custody.held(&AssetHandle::Native), 0);
        assert_eq!(h.pool.rate_consumed(Direction::Inflow, 1).unwrap(), 0);
    }
}

// =============================================================================
// CONCURRENCY
// =============================================================================

mod concurrency_tests {
    use super::*;

    #[test]
    fn test_concurrent_shields_respect_ceiling() {
        const THREADS: u64 = 16;
        let h = Harness::new(PoolConfig {
            inflow_ceiling: 10 * UNIT,
            ..test_config()
        });

        let results: Vec<PoolResult<ShieldReceipt>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|i| {
                    let h = &h;
                    scope.spawn(move || h.shield(9, 1_000 + i, UNIT))
                })
                .collect();
            handles.into_iter().map(|t| t.join().unwrap()).collect()
        });

        let accepted = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(accepted, 10);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| e.kind() == ErrorKind::RateLimit));

        let mut leaves: Vec<u64> = results
            .iter()
            .filter_map(|r| r.as_ref().ok())
            .map(|r| r.leaf_index)
            .collect();
        leaves.sort_unstable();
        assert_eq!(leaves, (0..10).collect::<Vec<_>>());
        assert_eq!(h.pool.rate_consumed(Direction::Inflow, 9).unwrap(), 10 * UNIT);
    }

    #[test]
    fn test_concurrent_double_spend_single_winner() {
        let h = Harness::new(test_config());
        h.shield(1, 1, UNIT).unwrap();
        let root = h.root();

        let results: Vec<PoolResult<UnshieldReceipt>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let h = &h;
                    scope.spawn(move || h.unshield(1, 42, UNIT, bob(), root))
                })
                .collect();
            handles.into_iter().map(|t| t.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(h.custody.balance(&AssetHandle::Native, &bob()), UNIT);
    }

    /// Custody that tries to shield again while pulling funds
    struct ReentrantCustody {
        inner: InMemoryCustody,
        pool: Mutex<Weak<ShieldedPool>>,
        nested: Mutex<Option<PoolResult<ShieldReceipt>>>,
    }

    impl Custody for ReentrantCustody {
        fn pull(&self, asset: &AssetHandle, from: &Address, amount: Amount) -> Result<(), CustodyError> {
            let pool = self.pool.lock().upgrade();
            if let Some(pool) = pool {
                let result = pool.shield(
                    &CallContext::new(*from, 1, 0),
                    &Proof::default(),
                    field(999),
                    amount,
                    NATIVE_ASSET_ID,
                    None,
                );
                *self.nested.lock() = Some(result);
            }
            self.inner.pull(asset, from, amount)
        }

        fn push(&self, asset: &AssetHandle, to: &Address, amount: Amount) -> Result<(), CustodyError> {
            self.inner.push(asset, to, amount)
        }
    }

    #[test]
    fn test_nested_shield_is_rejected() {
        let custody = Arc::new(ReentrantCustody {
            inner: InMemoryCustody::new(),
            pool: Mutex::new(Weak::new()),
            nested: Mutex::new(None),
        });
        custody.inner.fund(AssetHandle::Native, alice(), 5 * UNIT);

        let pool = Arc::new(
            ShieldedPool::from_config(
                &test_config(),
                Arc::new(Blake3Oracle),
                Collaborators::new(
                    VerifierSet::accept_all(),
                    custody.clone(),
                    Arc::new(AdminList::single(admin())),
                ),
            )
            .unwrap(),
        );
        *custody.pool.lock() = Arc::downgrade(&pool);

        let receipt = pool
            .shield(&CallContext::new(alice(), 1, 0), &Proof::default(), field(1), UNIT, NATIVE_ASSET_ID, None)
            .unwrap();

        assert_eq!(receipt.leaf_index, 0);
        assert_eq!(*custody.nested.lock(), Some(Err(PoolError::Reentrancy)));
        assert_eq!(pool.note_count().unwrap(), 1);
        assert_eq!(custody.inner.held(&AssetHandle::Native), UNIT);
    }
}

// =============================================================================
// ADMIN, PAUSE AND ASSETS
// =============================================================================

mod admin_tests {
    use super::*;

    #[test]
    fn test_paused_pool_rejects_every_operation() {
        let h = Harness::new(test_config());
        h.shield(1, 1, UNIT).unwrap();
        let root = h.root();

        h.pool.pause(&CallContext::new(admin(), 1, 0)).unwrap();
        assert!(h.pool.is_paused().unwrap());

        assert_eq!(
            h.pool.register_asset(&CallContext::new(admin(), 1, 0), Address::from_bytes([5; 20])),
            Err(PoolError::Paused)
        );
        assert_eq!(h.shield(1, 2, UNIT), Err(PoolError::Paused));
        assert_eq!(h.transfer(3, 4, root), Err(PoolError::Paused));
        assert_eq!(h.unshield(1, 5, UNIT, bob(), root), Err(PoolError::Paused));

        h.pool.unpause(&CallContext::new(admin(), 1, 0)).unwrap();
        assert!(h.unshield(1, 5, UNIT, bob(), root).is_ok());

        let events = h.pool.drain_events().unwrap();
        assert!(events.contains(&PoolEvent::Paused { by: admin() }));
        assert!(events.contains(&PoolEvent::Unpaused { by: admin() }));
    }

    #[test]
    fn test_registered_token_flow() {
        let h = Harness::new(test_config());
        let token = Address::from_bytes([0x70; 20]);

        let asset_id = h
            .pool
            .register_asset(&CallContext::new(admin(), 1, 0), token)
            .unwrap();
        assert_eq!(asset_id, cloak::pool::derive_asset_id(&token));
        assert!(h.pool.is_registered(&asset_id).unwrap());

        h.custody.fund(AssetHandle::External(token), alice(), 100 * UNIT);
        h.shield_asset(1, field(1), 100 * UNIT, asset_id, None).unwrap();

        assert_eq!(h.pool.balance_of(&asset_id).unwrap(), 100 * UNIT);
        assert_eq!(h.pool.balance_of(&NATIVE_ASSET_ID).unwrap(), 0);
        assert_eq!(h.custody.held(&AssetHandle::External(token)), 100 * UNIT);
    }

    #[test]
    fn test_non_admin_cannot_register() {
        let h = Harness::new(test_config());
        let err = h
            .pool
            .register_asset(&CallContext::new(alice(), 1, 0), Address::from_bytes([0x70; 20]))
            .unwrap_err();
        assert_eq!(err, PoolError::NotAdmin(alice()));
        assert_eq!(err.kind(), ErrorKind::Authorization);
    }
}

// =============================================================================
// VARIANTS AND EVENTS
// =============================================================================

mod variant_tests {
    use super::*;

    #[test]
    fn test_variants_have_disjoint_nullifier_spaces() {
        let plain = Harness::new(test_config());
        let stealth = Harness::new(test_config().with_variant(PoolVariant::Stealth));

        plain.shield(1, 1, UNIT).unwrap();
        stealth
            .shield_asset(1, field(1), UNIT, NATIVE_ASSET_ID, Some(StealthPayload::new(vec![0xee; 64])))
            .unwrap();

        plain.unshield(1, 7, UNIT, bob(), plain.root()).unwrap();
        assert!(plain.pool.is_spent(&field(7)).unwrap());
        assert!(!stealth.pool.is_spent(&field(7)).unwrap());
        assert!(stealth.unshield(1, 7, UNIT, bob(), stealth.root()).is_ok());
    }

    #[test]
    fn test_events_never_disclose_amount() {
        let h = Harness::new(test_config());
        h.shield(1, 1, 1_000 * UNIT).unwrap();
        h.unshield(1, 2, 1_000 * UNIT, bob(), h.root()).unwrap();

        let events = h.pool.drain_events().unwrap();
        assert_eq!(events.len(), 2);
        for event in &events {
            let json = serde_json::to_value(event).unwrap();
            assert!(json.get("amount").is_none());
        }
    }
}

// =============================================================================
// SNAPSHOTS
// =============================================================================

mod snapshot_tests {
    use super::*;

    #[test]
    fn test_snapshot_file_preserves_queries() {
        let h = Harness::new(test_config());
        h.shield(1, 1, UNIT).unwrap();
        h.shield(1, 2, 10 * UNIT).unwrap();
        let old_root = h.root();
        h.transfer(30, 3, old_root).unwrap();
        h.unshield(2, 31, UNIT, bob(), h.root()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pool.bin");
        save_snapshot(&path, &h.pool.snapshot().unwrap()).unwrap();

        let restored = ShieldedPool::restore(
            load_snapshot(&path).unwrap(),
            Arc::new(Blake3Oracle),
            collaborators(&h.custody),
        )
        .unwrap();

        assert_eq!(restored.last_root().unwrap(), h.root());
        assert!(restored.is_known_root(&old_root).unwrap());
        assert!(restored.is_spent(&field(30)).unwrap());
        assert!(restored.is_spent(&field(31)).unwrap());
        assert_eq!(restored.note_count().unwrap(), 3);
        assert_eq!(restored.balance_of(&NATIVE_ASSET_ID).unwrap(), 10 * UNIT);
        assert_eq!(restored.rate_consumed(Direction::Inflow, 1).unwrap(), 11 * UNIT);
        assert_eq!(restored.rate_consumed(Direction::Outflow, 2).unwrap(), UNIT);

        // Restored pool keeps accepting work where the original left off
        let receipt = h.shield(3, 4, UNIT).unwrap();
        let proof = Proof::digest(Circuit::Shield, &shield_inputs(UNIT, NATIVE_ASSET_ID, field(4)));
        let restored_receipt = restored
            .shield(&CallContext::new(alice(), 3, 0), &proof, field(4), UNIT, NATIVE_ASSET_ID, None)
            .unwrap();
        assert_eq!(restored_receipt, receipt);
    }

    #[test]
    fn test_restore_with_wrong_oracle_fails() {
        let h = Harness::new(test_config());
        h.shield(1, 1, UNIT).unwrap();

        let err = ShieldedPool::restore(
            h.pool.snapshot().unwrap(),
            Arc::new(PoseidonOracle::new()),
            collaborators(&h.custody),
        )
        .unwrap_err();
        assert!(matches!(err, PoolError::CorruptSnapshot(_)));
    }
}
