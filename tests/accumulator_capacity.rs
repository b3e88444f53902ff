//! Full-Depth Accumulator Tests
//!
//! Fills a depth-20 accumulator to capacity. Uses a byte-mixing oracle so the
//! million inserts stay fast; the accumulator never interprets leaf bytes, so
//! the walk is the same one Poseidon would drive.

use std::sync::Arc;

use cloak::pool::{zero_leaf, DEFAULT_TREE_DEPTH};
use cloak::prelude::*;

/// Order-sensitive, deterministic and cheap. Not a hash.
struct MixOracle;

impl HashOracle for MixOracle {
    fn hash_pair(&self, left: &FieldElement, right: &FieldElement) -> FieldElement {
        let (l, r) = (left.as_bytes(), right.as_bytes());
        let mut out = [0u8; 32];
        for i in 0..32 {
            out[i] = l[i].rotate_left(3) ^ r[31 - i].wrapping_mul(0x9d) ^ (i as u8);
        }
        FieldElement::from_bytes(out)
    }

    fn name(&self) -> &'static str {
        "mix-test"
    }
}

/// Pairwise reduction of the full leaf row, padding with zero subtrees
fn reference_root(oracle: &dyn HashOracle, depth: usize, leaves: &[FieldElement]) -> FieldElement {
    let mut zero = zero_leaf();
    let mut level: Vec<FieldElement> = leaves.to_vec();

    for _ in 0..depth {
        if level.is_empty() {
            level.push(zero);
        }
        if level.len() % 2 == 1 {
            level.push(zero);
        }
        level = level
            .chunks(2)
            .map(|pair| oracle.hash_pair(&pair[0], &pair[1]))
            .collect();
        zero = oracle.hash_pair(&zero, &zero);
    }

    level[0]
}

fn leaf(i: u64) -> FieldElement {
    let mut bytes = [0u8; 32];
    bytes[24..].copy_from_slice(&(i.wrapping_mul(0x9e37_79b9_7f4a_7c15)).to_be_bytes());
    bytes[0] = 0x0c;
    FieldElement::from_bytes(bytes)
}

#[test]
fn test_small_counts_match_reference() {
    for n in [0u64, 1, 2, 5] {
        let mut accumulator = Accumulator::new(DEFAULT_TREE_DEPTH, Arc::new(MixOracle)).unwrap();
        let leaves: Vec<FieldElement> = (0..n).map(leaf).collect();
        for l in &leaves {
            accumulator.insert(*l).unwrap();
        }

        assert_eq!(
            accumulator.last_root(),
            reference_root(&MixOracle, DEFAULT_TREE_DEPTH, &leaves),
            "n = {}",
            n
        );
    }
}

#[test]
fn test_fill_to_capacity() {
    let mut accumulator = Accumulator::new(DEFAULT_TREE_DEPTH, Arc::new(MixOracle)).unwrap();
    let capacity = accumulator.capacity();
    assert_eq!(capacity, 1 << 20);

    let leaves: Vec<FieldElement> = (0..capacity).map(leaf).collect();
    for (i, l) in leaves.iter().enumerate() {
        assert_eq!(accumulator.insert(*l).unwrap(), i as u64);
    }

    assert!(accumulator.is_full());
    assert_eq!(
        accumulator.last_root(),
        reference_root(&MixOracle, DEFAULT_TREE_DEPTH, &leaves)
    );

    let root = accumulator.last_root();
    assert_eq!(
        accumulator.insert(leaf(capacity)),
        Err(PoolError::CapacityExceeded { capacity })
    );
    assert_eq!(accumulator.last_root(), root);
    assert_eq!(accumulator.next_leaf_index(), capacity);
}
