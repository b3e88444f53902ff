//! Nullifier Set - Double-Spend Prevention
//!
//! A note's nullifier hash is revealed exactly once, when the note is spent.
//! Membership in this set is permanent: the public API has no way to remove
//! an entry.

use std::collections::HashSet;

use cloak_hash::FieldElement;

use crate::errors::{PoolError, PoolResult};

/// Set of spent nullifier hashes
#[derive(Clone, Debug, Default)]
pub struct NullifierSet {
    spent: HashSet<FieldElement>,
}

impl NullifierSet {
    pub fn new() -> Self {
        Self {
            spent: HashSet::new(),
        }
    }

    pub fn is_spent(&self, nullifier: &FieldElement) -> bool {
        self.spent.contains(nullifier)
    }

    /// Mark a nullifier spent
    ///
    /// Returns error if it was already spent (double-spend attempt)
    pub fn mark_spent(&mut self, nullifier: FieldElement) -> PoolResult<()> {
        if !self.spent.insert(nullifier) {
            return Err(PoolError::AlreadySpent(nullifier));
        }
        Ok(())
    }

    /// Undo a mark made by the operation that is still in flight
    pub(crate) fn revert_in_flight(&mut self, nullifier: &FieldElement) {
        self.spent.remove(nullifier);
    }

    pub fn len(&self) -> usize {
        self.spent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spent.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldElement> {
        self.spent.iter()
    }
}

impl FromIterator<FieldElement> for NullifierSet {
    fn from_iter<I: IntoIterator<Item = FieldElement>>(iter: I) -> Self {
        Self {
            spent: iter.into_iter().collect(),
        }
    }
}
