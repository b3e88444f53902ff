//! Two-to-one hash oracles consumed by the accumulator

use crate::field::FieldElement;
use crate::poseidon::{poseidon_hash_two_with, PoseidonParams};

/// Two-to-one hash over the BN254 scalar field
///
/// The accumulator is generic over this oracle; it must be deterministic and
/// order-sensitive, and its output must be a canonical field element.
pub trait HashOracle: Send + Sync {
    fn hash_pair(&self, left: &FieldElement, right: &FieldElement) -> FieldElement;

    /// Short identifier recorded in snapshots
    fn name(&self) -> &'static str;
}

/// Poseidon (t = 3) oracle matching [`crate::poseidon`]
#[derive(Clone, Default)]
pub struct PoseidonOracle {
    params: PoseidonParams,
}

impl PoseidonOracle {
    pub fn new() -> Self {
        Self {
            params: PoseidonParams::new(),
        }
    }
}

impl HashOracle for PoseidonOracle {
    fn hash_pair(&self, left: &FieldElement, right: &FieldElement) -> FieldElement {
        let out = poseidon_hash_two_with(
            &self.params,
            &left.to_fr_reduced(),
            &right.to_fr_reduced(),
        );
        FieldElement::from_fr(&out)
    }

    fn name(&self) -> &'static str {
        "poseidon-bn254-t3"
    }
}

/// BLAKE3 compression reduced into the field
///
/// Not circuit friendly. Used for simulations and large test trees where the
/// Poseidon cost dominates.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake3Oracle;

impl HashOracle for Blake3Oracle {
    fn hash_pair(&self, left: &FieldElement, right: &FieldElement) -> FieldElement {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"cloak_blake3_pair");
        hasher.update(left.as_bytes());
        hasher.update(right.as_bytes());
        FieldElement::reduce(hasher.finalize().as_bytes())
    }

    fn name(&self) -> &'static str {
        "blake3-reduced"
    }
}
