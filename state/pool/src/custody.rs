//! Custody collaborator
//!
//! The ledger never holds assets itself. It asks a [`Custody`] implementation
//! to pull funds from a depositor on shield and push them to a recipient on
//! unshield. Each call either moves the full amount or fails without effect.

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;
use thiserror::Error;

use crate::asset::AssetHandle;
use crate::types::{Address, Amount};

/// Reasons a custody transfer can fail
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CustodyError {
    #[error("Insufficient funds in {account}: available {available}, requested {requested}")]
    InsufficientFunds {
        account: Address,
        available: Amount,
        requested: Amount,
    },

    #[error("Pool holds {available}, cannot pay out {requested}")]
    PoolUnderfunded { available: Amount, requested: Amount },

    #[error("Transfer rejected: {0}")]
    Rejected(String),
}

/// All-or-nothing asset movement on behalf of the pool
pub trait Custody: Send + Sync {
    /// Move `amount` of `asset` from `from` into the pool
    fn pull(&self, asset: &AssetHandle, from: &Address, amount: Amount) -> Result<(), CustodyError>;

    /// Move `amount` of `asset` from the pool to `to`
    fn push(&self, asset: &AssetHandle, to: &Address, amount: Amount) -> Result<(), CustodyError>;
}

#[derive(Default)]
struct Books {
    accounts: HashMap<(AssetHandle, Address), Amount>,
    held: HashMap<AssetHandle, Amount>,
    frozen: HashSet<Address>,
}

/// In-process custody over plain account balances
///
/// Used by the CLI simulator and tests.
#[derive(Default)]
pub struct InMemoryCustody {
    books: Mutex<Books>,
}

impl InMemoryCustody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `amount` into an external account
    pub fn fund(&self, asset: AssetHandle, account: Address, amount: Amount) {
        let mut books = self.books.lock();
        let balance = books.accounts.entry((asset, account)).or_insert(0);
        *balance = balance.saturating_add(amount);
    }

    pub fn balance(&self, asset: &AssetHandle, account: &Address) -> Amount {
        self.books
            .lock()
            .accounts
            .get(&(*asset, *account))
            .copied()
            .unwrap_or(0)
    }

    /// Amount currently held on behalf of the pool
    pub fn held(&self, asset: &AssetHandle) -> Amount {
        self.books.lock().held.get(asset).copied().unwrap_or(0)
    }

    /// Credit assets already held on behalf of the pool, e.g. after a restart
    pub fn fund_pool(&self, asset: AssetHandle, amount: Amount) {
        let mut books = self.books.lock();
        let held = books.held.entry(asset).or_insert(0);
        *held = held.saturating_add(amount);
    }

    /// Reject every transfer touching `account` until unfrozen
    pub fn freeze(&self, account: Address) {
        self.books.lock().frozen.insert(account);
    }

    pub fn unfreeze(&self, account: &Address) {
        self.books.lock().frozen.remove(account);
    }
}

impl Custody for InMemoryCustody {
    fn pull(&self, asset: &AssetHandle, from: &Address, amount: Amount) -> Result<(), CustodyError> {
        let mut books = self.books.lock();
        if books.frozen.contains(from) {
            return Err(CustodyError::Rejected(format!("account {} is frozen", from)));
        }

        let available = books.accounts.get(&(*asset, *from)).copied().unwrap_or(0);
        if available < amount {
            return Err(CustodyError::InsufficientFunds {
                account: *from,
                available,
                requested: amount,
            });
        }

        books.accounts.insert((*asset, *from), available - amount);
        let held = books.held.entry(*asset).or_insert(0);
        *held = held.saturating_add(amount);
        Ok(())
    }

    fn push(&self, asset: &AssetHandle, to: &Address, amount: Amount) -> Result<(), CustodyError> {
        let mut books = self.books.lock();
        if books.frozen.contains(to) {
            return Err(CustodyError::Rejected(format!("account {} is frozen", to)));
        }

        let held = books.held.get(asset).copied().unwrap_or(0);
        if held < amount {
            return Err(CustodyError::PoolUnderfunded {
                available: held,
                requested: amount,
            });
        }

        books.held.insert(*asset, held - amount);
        let balance = books.accounts.entry((*asset, *to)).or_insert(0);
        *balance = balance.saturating_add(amount);
        Ok(())
    }
}
