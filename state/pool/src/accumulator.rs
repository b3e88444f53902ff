//! Commitment Accumulator - Append-Only Merkle Tree with Root History
//!
//! Commitments are appended as leaves of a fixed-depth binary tree. Only the
//! rightmost frontier is stored: `filled_subtrees[level]` holds the most
//! recent left sibling at each level, and every position to the right of the
//! frontier is known to be `zeros[level]`. State is O(depth) instead of
//! O(2^depth), at the cost of supporting append only.
//!
//! The last [`ROOT_HISTORY_SIZE`] roots are kept in a ring so that proofs built
//! against a slightly stale root still verify.

use std::sync::Arc;

use cloak_hash::{FieldElement, HashOracle};
use serde::{Deserialize, Serialize};

use crate::errors::{PoolError, PoolResult};

/// Canonical tree depth (2^20 leaves)
pub const DEFAULT_TREE_DEPTH: usize = 20;

/// Deepest tree the leaf counter can address
pub const MAX_TREE_DEPTH: usize = 32;

/// Number of historical roots accepted by [`Accumulator::is_known_root`]
pub const ROOT_HISTORY_SIZE: usize = 100;

const ZERO_LEAF_DOMAIN: &[u8] = b"cloak/accumulator/zero-leaf/v1";

/// The empty-leaf value `zeros[0]`
pub fn zero_leaf() -> FieldElement {
    FieldElement::hash_to_field(ZERO_LEAF_DOMAIN, &[])
}

/// Incremental merkle tree over an injected hash oracle
#[derive(Clone)]
pub struct Accumulator {
    oracle: Arc<dyn HashOracle>,
    depth: usize,
    /// `zeros[i]` is the root of an empty subtree of height `i`
    zeros: Vec<FieldElement>,
    filled_subtrees: Vec<FieldElement>,
    roots: [FieldElement; ROOT_HISTORY_SIZE],
    current_root_index: usize,
    next_leaf_index: u64,
}

impl Accumulator {
    /// Build an empty tree; its root is the single entry of the history ring
    pub fn new(depth: usize, oracle: Arc<dyn HashOracle>) -> PoolResult<Self> {
        if depth == 0 || depth > MAX_TREE_DEPTH {
            return Err(PoolError::InvalidConfig(format!(
                "tree depth must be in 1..={}, got {}",
                MAX_TREE_DEPTH, depth
            )));
        }

        let zeros = compute_zeros(oracle.as_ref(), depth);
        let empty_root = oracle.hash_pair(&zeros[depth - 1], &zeros[depth - 1]);

        let mut roots = [FieldElement::ZERO; ROOT_HISTORY_SIZE];
        roots[0] = empty_root;

        Ok(Self {
            oracle,
            depth,
            filled_subtrees: zeros.clone(),
            zeros,
            roots,
            current_root_index: 0,
            next_leaf_index: 0,
        })
    }

    /// Append a leaf, returning its index
    pub fn insert(&mut self, leaf: FieldElement) -> PoolResult<u64> {
        if self.is_full() {
            return Err(PoolError::CapacityExceeded {
                capacity: self.capacity(),
            });
        }

        let leaf_index = self.next_leaf_index;
        let mut index = leaf_index;
        let mut current = leaf;

        for level in 0..self.depth {
            let (left, right) = if index % 2 == 0 {
                self.filled_subtrees[level] = current;
                (current, self.zeros[level])
            } else {
                (self.filled_subtrees[level], current)
            };
            current = self.oracle.hash_pair(&left, &right);
            index /= 2;
        }

        self.current_root_index = (self.current_root_index + 1) % ROOT_HISTORY_SIZE;
        self.roots[self.current_root_index] = current;
        self.next_leaf_index += 1;

        Ok(leaf_index)
    }

    /// Whether `root` is one of the last [`ROOT_HISTORY_SIZE`] roots
    ///
    /// The zero value is never a known root; unwritten ring slots hold it.
    pub fn is_known_root(&self, root: &FieldElement) -> bool {
        if root.is_zero() {
            return false;
        }

        let mut i = self.current_root_index;
        for _ in 0..ROOT_HISTORY_SIZE {
            if self.roots[i] == *root {
                return true;
            }
            i = if i == 0 { ROOT_HISTORY_SIZE - 1 } else { i - 1 };
        }

        false
    }

    pub fn last_root(&self) -> FieldElement {
        self.roots[self.current_root_index]
    }

    /// Root of the empty tree of this depth
    pub fn empty_root(&self) -> FieldElement {
        let top = self.zeros[self.depth - 1];
        self.oracle.hash_pair(&top, &top)
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn capacity(&self) -> u64 {
        1u64 << self.depth
    }

    pub fn next_leaf_index(&self) -> u64 {
        self.next_leaf_index
    }

    pub fn is_full(&self) -> bool {
        self.next_leaf_index >= self.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.next_leaf_index == 0
    }

    pub fn zeros(&self, level: usize) -> Option<FieldElement> {
        self.zeros.get(level).copied()
    }

    pub fn filled_subtree(&self, level: usize) -> Option<FieldElement> {
        self.filled_subtrees.get(level).copied()
    }

    pub fn current_root_index(&self) -> usize {
        self.current_root_index
    }

    /// Raw ring contents in slot order
    pub fn root_history(&self) -> &[FieldElement; ROOT_HISTORY_SIZE] {
        &self.roots
    }

    pub fn oracle_name(&self) -> &'static str {
        self.oracle.name()
    }

    pub fn snapshot(&self) -> AccumulatorSnapshot {
        AccumulatorSnapshot {
            oracle: self.oracle.name().to_string(),
            depth: self.depth,
            zeros: self.zeros.clone(),
            filled_subtrees: self.filled_subtrees.clone(),
            roots: self.roots.to_vec(),
            current_root_index: self.current_root_index,
            next_leaf_index: self.next_leaf_index,
        }
    }

    /// Rebuild from a snapshot, checking it against the injected oracle
    pub fn from_snapshot(
        snapshot: AccumulatorSnapshot,
        oracle: Arc<dyn HashOracle>,
    ) -> PoolResult<Self> {
        let corrupt = |msg: String| PoolError::CorruptSnapshot(msg);

        if snapshot.oracle != oracle.name() {
            return Err(corrupt(format!(
                "snapshot built with oracle {}, restoring with {}",
                snapshot.oracle,
                oracle.name()
            )));
        }

        let depth = snapshot.depth;
        if depth == 0 || depth > MAX_TREE_DEPTH {
            return Err(corrupt(format!("tree depth {} out of range", depth)));
        }
        if snapshot.zeros.len() != depth || snapshot.filled_subtrees.len() != depth {
            return Err(corrupt("level tables do not match tree depth".into()));
        }
        if snapshot.zeros != compute_zeros(oracle.as_ref(), depth) {
            return Err(corrupt("zero table does not match hash oracle".into()));
        }
        if snapshot.next_leaf_index > (1u64 << depth) {
            return Err(corrupt(format!(
                "leaf counter {} exceeds capacity",
                snapshot.next_leaf_index
            )));
        }
        if snapshot.current_root_index >= ROOT_HISTORY_SIZE {
            return Err(corrupt(format!(
                "root index {} out of range",
                snapshot.current_root_index
            )));
        }

        let roots: [FieldElement; ROOT_HISTORY_SIZE] = snapshot
            .roots
            .try_into()
            .map_err(|v: Vec<FieldElement>| {
                corrupt(format!("root ring has {} slots, expected {}", v.len(), ROOT_HISTORY_SIZE))
            })?;

        if roots[snapshot.current_root_index].is_zero() {
            return Err(corrupt("current root slot is empty".into()));
        }

        Ok(Self {
            oracle,
            depth,
            zeros: snapshot.zeros,
            filled_subtrees: snapshot.filled_subtrees,
            roots,
            current_root_index: snapshot.current_root_index,
            next_leaf_index: snapshot.next_leaf_index,
        })
    }
}

impl std::fmt::Debug for Accumulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accumulator")
            .field("oracle", &self.oracle.name())
            .field("depth", &self.depth)
            .field("next_leaf_index", &self.next_leaf_index)
            .field("last_root", &self.last_root())
            .finish()
    }
}

/// `zeros[0] = zero_leaf()`, `zeros[i] = H(zeros[i-1], zeros[i-1])`
fn compute_zeros(oracle: &dyn HashOracle, depth: usize) -> Vec<FieldElement> {
    let mut zeros = Vec::with_capacity(depth);
    let mut current = zero_leaf();
    for _ in 0..depth {
        zeros.push(current);
        current = oracle.hash_pair(&current, &current);
    }
    zeros
}

/// Serializable accumulator state
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccumulatorSnapshot {
    pub oracle: String,
    pub depth: usize,
    pub zeros: Vec<FieldElement>,
    pub filled_subtrees: Vec<FieldElement>,
    pub roots: Vec<FieldElement>,
    pub current_root_index: usize,
    pub next_leaf_index: u64,
}
