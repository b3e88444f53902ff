//! Ledger snapshots
//!
//! A [`LedgerSnapshot`] captures every piece of ledger state except the
//! collaborators and the undrained event outbox. Collections are stored as
//! sorted vectors so equal ledgers produce byte-identical encodings.

use std::fs;
use std::path::Path;

use cloak_hash::FieldElement;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::accumulator::AccumulatorSnapshot;
use crate::asset::{AssetHandle, AssetId};
use crate::errors::PoolError;
use crate::rate::RateSnapshot;
use crate::types::{Amount, PoolVariant};

/// Snapshot persistence errors
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),
}

/// Serializable ledger state
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: u32,
    pub variant: PoolVariant,
    pub accumulator: AccumulatorSnapshot,
    pub nullifiers: Vec<FieldElement>,
    pub rate: RateSnapshot,
    pub denominations: Vec<Amount>,
    pub assets: Vec<(AssetId, AssetHandle)>,
    pub balances: Vec<(AssetId, Amount)>,
    pub note_count: u64,
    pub paused: bool,
}

impl LedgerSnapshot {
    /// Current encoding version
    pub const VERSION: u32 = 1;

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Write a snapshot atomically (temp file, then rename)
pub fn save_snapshot(path: &Path, snapshot: &LedgerSnapshot) -> Result<(), SnapshotError> {
    let bytes = snapshot.to_bytes()?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load_snapshot(path: &Path) -> Result<LedgerSnapshot, SnapshotError> {
    let bytes = fs::read(path)?;
    LedgerSnapshot::from_bytes(&bytes)
}
