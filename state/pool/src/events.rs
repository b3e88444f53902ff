//! Notifications and receipts
//!
//! Shield and unshield notifications never carry the amount.

use cloak_hash::FieldElement;
use serde::{Deserialize, Serialize};

use crate::asset::{AssetHandle, AssetId};
use crate::types::{Address, StealthPayload};

/// Event appended to the pool's outbox on every committed operation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PoolEvent {
    AssetRegistered {
        asset_id: AssetId,
        handle: AssetHandle,
    },
    Shielded {
        commitment: FieldElement,
        leaf_index: u64,
        asset_id: AssetId,
        timestamp: u64,
        /// Present only in stealth pools
        payload: Option<StealthPayload>,
    },
    Transferred {
        nullifier_hash: FieldElement,
        new_commitment: FieldElement,
        leaf_index: u64,
        timestamp: u64,
    },
    Unshielded {
        nullifier_hash: FieldElement,
        asset_id: AssetId,
        recipient: Address,
        timestamp: u64,
    },
    Paused {
        by: Address,
    },
    Unpaused {
        by: Address,
    },
}

/// Result of a successful shield
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShieldReceipt {
    pub leaf_index: u64,
    pub root: FieldElement,
}

/// Result of a successful private transfer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub leaf_index: u64,
    pub root: FieldElement,
}

/// Result of a successful unshield
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnshieldReceipt {
    pub nullifier_hash: FieldElement,
    pub recipient: Address,
}
