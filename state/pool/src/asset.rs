//! Asset registry and locked-balance ledger
//!
//! Every asset the pool accepts is registered once, under an id derived from
//! its external token identifier. The native asset is pre-registered under
//! the zero id.

use std::collections::HashMap;
use std::fmt;

use cloak_hash::FieldElement;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::errors::{PoolError, PoolResult};
use crate::types::{Address, Amount};

/// Field-encoded asset identifier
pub type AssetId = FieldElement;

/// Sentinel id of the native asset
pub const NATIVE_ASSET_ID: AssetId = FieldElement::ZERO;

const ASSET_ID_DOMAIN: &[u8] = b"cloak/asset-id/v1";

/// Derive the pool-side id of an external token
pub fn derive_asset_id(external: &Address) -> AssetId {
    FieldElement::hash_to_field(ASSET_ID_DOMAIN, external.as_bytes())
}

/// What custody moves when an asset id is referenced
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetHandle {
    Native,
    External(Address),
}

impl fmt::Display for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetHandle::Native => f.write_str("native"),
            AssetHandle::External(token) => write!(f, "token {}", token),
        }
    }
}

/// Registered assets, immutable once added
#[derive(Clone, Debug)]
pub struct AssetRegistry {
    assets: HashMap<AssetId, AssetHandle>,
}

impl AssetRegistry {
    /// Registry holding only the native asset
    pub fn new() -> Self {
        let mut assets = HashMap::new();
        assets.insert(NATIVE_ASSET_ID, AssetHandle::Native);
        Self { assets }
    }

    /// Id that `register` would assign, after validating the identifier
    pub fn prepare(&self, external: &Address) -> PoolResult<AssetId> {
        if external.is_null() {
            return Err(PoolError::InvalidAssetId(
                "external token identifier is null".into(),
            ));
        }
        let asset_id = derive_asset_id(external);
        if self.assets.contains_key(&asset_id) {
            return Err(PoolError::AlreadyRegistered(asset_id));
        }
        Ok(asset_id)
    }

    pub fn register(&mut self, external: Address) -> PoolResult<AssetId> {
        let asset_id = self.prepare(&external)?;
        self.assets.insert(asset_id, AssetHandle::External(external));
        Ok(asset_id)
    }

    pub fn is_registered(&self, asset_id: &AssetId) -> bool {
        self.assets.contains_key(asset_id)
    }

    pub fn handle(&self, asset_id: &AssetId) -> PoolResult<AssetHandle> {
        self.assets
            .get(asset_id)
            .copied()
            .ok_or(PoolError::UnregisteredAsset(*asset_id))
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AssetId, &AssetHandle)> {
        self.assets.iter()
    }

    pub(crate) fn from_entries(entries: impl IntoIterator<Item = (AssetId, AssetHandle)>) -> Self {
        let mut registry = Self::new();
        registry.assets.extend(entries);
        registry
    }
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Cumulative amount of each asset held by the pool
#[derive(Clone, Debug, Default)]
pub struct LockedBalances {
    balances: HashMap<AssetId, Amount>,
}

impl LockedBalances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, asset_id: &AssetId) -> Amount {
        self.balances.get(asset_id).copied().unwrap_or(0)
    }

    pub fn credit(&mut self, asset_id: AssetId, amount: Amount) {
        let entry = self.balances.entry(asset_id).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Decrease a balance, clamping at zero; returns the entry as it was
    ///
    /// A spend larger than the locked balance means the proof system let
    /// through a note the pool never received; it is logged, not rejected.
    pub fn debit(&mut self, asset_id: AssetId, amount: Amount) -> Option<Amount> {
        let previous = self.balances.get(&asset_id).copied();
        let locked = previous.unwrap_or(0);
        if locked < amount {
            error!(
                asset = %asset_id,
                locked = %locked,
                requested = %amount,
                "Unshield exceeds locked balance"
            );
        }
        self.balances.insert(asset_id, locked.saturating_sub(amount));
        previous
    }

    /// Put back the entry returned by an in-flight [`debit`](Self::debit)
    pub(crate) fn restore_in_flight(&mut self, asset_id: AssetId, previous: Option<Amount>) {
        match previous {
            Some(amount) => self.balances.insert(asset_id, amount),
            None => self.balances.remove(&asset_id),
        };
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AssetId, &Amount)> {
        self.balances.iter()
    }
}

impl FromIterator<(AssetId, Amount)> for LockedBalances {
    fn from_iter<I: IntoIterator<Item = (AssetId, Amount)>>(iter: I) -> Self {
        Self {
            balances: iter.into_iter().collect(),
        }
    }
}
