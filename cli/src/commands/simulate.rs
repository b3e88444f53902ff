//! Simulate Command - replay an operation script against a pool
//!
//! Proofs are not checked: the pool runs with an accept-all verifier and
//! in-memory custody. Everything else (roots, nullifiers, rate windows,
//! denominations, pause state) behaves exactly as in production.
//!
//! Script format:
//!
//! ```json
//! {
//!   "funding": [{ "account": "0xa1..", "asset": "native", "amount": "1000000000000000000" }],
//!   "steps": [
//!     { "op": "shield", "caller": "0xa1..", "window": 1, "commitment": "0x..", "amount": "1000000000000000000" },
//!     { "op": "unshield", "caller": "0xa1..", "window": 1, "nullifier": "0x..",
//!       "amount": "1000000000000000000", "recipient": "0xb0.." }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use cloak_hash::{FieldElement, HashOracle};
use cloak_pool::types::amount_string;
use cloak_pool::{
    derive_asset_id, load_snapshot, save_snapshot, AdminList, Address, Amount, AssetHandle,
    AssetId, CallContext, Collaborators, ErrorKind, InMemoryCustody, LedgerSnapshot, PoolEvent,
    PoolResult, Proof, ShieldReceipt, ShieldedPool, StealthPayload, TransferReceipt,
    UnshieldReceipt, VerifierSet, WindowId, NATIVE_ASSET_ID,
};
use serde::{de, Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

use crate::config::CloakConfig;

/// Replay a JSON operation script
#[derive(Args)]
pub struct SimulateCommand {
    /// Path to the operation script (JSON)
    script: PathBuf,

    /// Snapshot file loaded before the run (if present) and written after it
    #[arg(short, long)]
    state: Option<PathBuf>,

    /// Stop at the first rejected operation
    #[arg(long)]
    fail_fast: bool,
}

impl SimulateCommand {
    pub fn execute(self, config: Option<PathBuf>, data_dir: Option<PathBuf>) -> anyhow::Result<()> {
        let config = CloakConfig::resolve(config, data_dir)?;
        let script: Script = serde_json::from_str(&fs::read_to_string(&self.script)?)?;

        let custody = Arc::new(InMemoryCustody::new());
        let oracle = config.ledger.oracle.build();
        let collaborators = Collaborators::new(
            VerifierSet::accept_all(),
            custody.clone(),
            Arc::new(AdminList::new(config.ledger.admins.iter().copied())),
        );

        let pool = match self.state.as_deref().filter(|path| path.exists()) {
            Some(path) => restore_pool(path, &custody, oracle, collaborators)?,
            None => ShieldedPool::from_config(&config.pool, oracle, collaborators)?,
        };

        warn!("Simulating with an accept-all proof verifier");
        let report = run_script(&pool, &custody, script, self.fail_fast)?;
        println!("{}", serde_json::to_string_pretty(&report)?);

        if let Some(path) = &self.state {
            save_snapshot(path, &pool.snapshot()?)?;
            info!("State saved to {}", path.display());
        }

        Ok(())
    }
}

/// Reload a pool and hand custody the assets the pool already holds
fn restore_pool(
    path: &Path,
    custody: &InMemoryCustody,
    oracle: Arc<dyn HashOracle>,
    collaborators: Collaborators,
) -> anyhow::Result<ShieldedPool> {
    let snapshot: LedgerSnapshot = load_snapshot(path)?;
    info!("Loaded state from {}", path.display());

    let handles: HashMap<AssetId, AssetHandle> = snapshot.assets.iter().copied().collect();
    for (asset_id, locked) in &snapshot.balances {
        if let Some(handle) = handles.get(asset_id) {
            custody.fund_pool(*handle, *locked);
        }
    }

    Ok(ShieldedPool::restore(snapshot, oracle, collaborators)?)
}

// ------------------------------------------------------------------
// Script format
// ------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Script {
    #[serde(default)]
    funding: Vec<Funding>,
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
struct Funding {
    account: Address,
    #[serde(default)]
    asset: AssetRef,
    #[serde(with = "amount_string")]
    amount: Amount,
}

/// `"native"` or a token address
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum AssetRef {
    #[default]
    Native,
    Token(Address),
}

impl AssetRef {
    fn id(&self) -> AssetId {
        match self {
            AssetRef::Native => NATIVE_ASSET_ID,
            AssetRef::Token(token) => derive_asset_id(token),
        }
    }

    fn handle(&self) -> AssetHandle {
        match self {
            AssetRef::Native => AssetHandle::Native,
            AssetRef::Token(token) => AssetHandle::External(*token),
        }
    }
}

impl<'de> Deserialize<'de> for AssetRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s == "native" {
            return Ok(AssetRef::Native);
        }
        Address::from_hex(&s).map(AssetRef::Token).map_err(de::Error::custom)
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Step {
    RegisterAsset {
        caller: Address,
        token: Address,
    },
    Shield {
        caller: Address,
        #[serde(default)]
        window: WindowId,
        #[serde(default)]
        timestamp: u64,
        commitment: FieldElement,
        #[serde(with = "amount_string")]
        amount: Amount,
        #[serde(default)]
        asset: AssetRef,
        /// Hex-encoded note payload (stealth pools)
        #[serde(default)]
        payload: Option<String>,
    },
    Transfer {
        caller: Address,
        #[serde(default)]
        window: WindowId,
        #[serde(default)]
        timestamp: u64,
        nullifier: FieldElement,
        commitment: FieldElement,
        /// Defaults to the current root
        #[serde(default)]
        root: Option<FieldElement>,
        #[serde(default)]
        asset: AssetRef,
    },
    Unshield {
        caller: Address,
        #[serde(default)]
        window: WindowId,
        #[serde(default)]
        timestamp: u64,
        nullifier: FieldElement,
        #[serde(with = "amount_string")]
        amount: Amount,
        #[serde(default)]
        asset: AssetRef,
        recipient: Address,
        /// Defaults to the current root
        #[serde(default)]
        root: Option<FieldElement>,
    },
    Pause {
        caller: Address,
    },
    Unpause {
        caller: Address,
    },
}

impl Step {
    fn name(&self) -> &'static str {
        match self {
            Step::RegisterAsset { .. } => "register_asset",
            Step::Shield { .. } => "shield",
            Step::Transfer { .. } => "transfer",
            Step::Unshield { .. } => "unshield",
            Step::Pause { .. } => "pause",
            Step::Unpause { .. } => "unpause",
        }
    }

    fn apply(&self, pool: &ShieldedPool) -> anyhow::Result<PoolResult<Receipt>> {
        let proof = Proof::default();

        let result = match self {
            Step::RegisterAsset { caller, token } => pool
                .register_asset(&CallContext::new(*caller, 0, 0), *token)
                .map(|asset_id| Receipt::Asset { asset_id }),
            Step::Shield {
                caller,
                window,
                timestamp,
                commitment,
                amount,
                asset,
                payload,
            } => {
                let payload = payload
                    .as_deref()
                    .map(|p| hex::decode(p.strip_prefix("0x").unwrap_or(p)))
                    .transpose()?
                    .map(StealthPayload::new);
                pool.shield(
                    &CallContext::new(*caller, *window, *timestamp),
                    &proof,
                    *commitment,
                    *amount,
                    asset.id(),
                    payload,
                )
                .map(Receipt::Shield)
            }
            Step::Transfer {
                caller,
                window,
                timestamp,
                nullifier,
                commitment,
                root,
                asset,
            } => {
                let root = match root {
                    Some(root) => *root,
                    None => pool.last_root()?,
                };
                pool.private_transfer(
                    &CallContext::new(*caller, *window, *timestamp),
                    &proof,
                    *nullifier,
                    *commitment,
                    root,
                    asset.id(),
                )
                .map(Receipt::Transfer)
            }
            Step::Unshield {
                caller,
                window,
                timestamp,
                nullifier,
                amount,
                asset,
                recipient,
                root,
            } => {
                let root = match root {
                    Some(root) => *root,
                    None => pool.last_root()?,
                };
                pool.unshield(
                    &CallContext::new(*caller, *window, *timestamp),
                    &proof,
                    *nullifier,
                    *amount,
                    asset.id(),
                    *recipient,
                    root,
                )
                .map(Receipt::Unshield)
            }
            Step::Pause { caller } => pool
                .pause(&CallContext::new(*caller, 0, 0))
                .map(|_| Receipt::Admin),
            Step::Unpause { caller } => pool
                .unpause(&CallContext::new(*caller, 0, 0))
                .map(|_| Receipt::Admin),
        };

        Ok(result)
    }
}

// ------------------------------------------------------------------
// Report
// ------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Receipt {
    Asset { asset_id: AssetId },
    Shield(ShieldReceipt),
    Transfer(TransferReceipt),
    Unshield(UnshieldReceipt),
    Admin,
}

#[derive(Debug, Serialize)]
struct StepOutcome {
    index: usize,
    op: &'static str,
    accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    receipt: Option<Receipt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<ErrorKind>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Report {
    steps: Vec<StepOutcome>,
    events: Vec<PoolEvent>,
    last_root: FieldElement,
    note_count: u64,
    paused: bool,
}

pub(crate) fn run_script(
    pool: &ShieldedPool,
    custody: &InMemoryCustody,
    script: Script,
    fail_fast: bool,
) -> anyhow::Result<Report> {
    for funding in &script.funding {
        custody.fund(funding.asset.handle(), funding.account, funding.amount);
    }

    let mut steps = Vec::with_capacity(script.steps.len());
    for (index, step) in script.steps.iter().enumerate() {
        let outcome = match step.apply(pool)? {
            Ok(receipt) => StepOutcome {
                index,
                op: step.name(),
                accepted: true,
                receipt: Some(receipt),
                error: None,
                kind: None,
            },
            Err(e) => StepOutcome {
                index,
                op: step.name(),
                accepted: false,
                receipt: None,
                error: Some(e.to_string()),
                kind: Some(e.kind()),
            },
        };

        let rejected = !outcome.accepted;
        steps.push(outcome);
        if rejected && fail_fast {
            break;
        }
    }

    Ok(Report {
        steps,
        events: pool.drain_events()?,
        last_root: pool.last_root()?,
        note_count: pool.note_count()?,
        paused: pool.is_paused()?,
    })
}
