//! Proof verifier collaborators
//!
//! The ledger does not verify SNARKs itself. Each circuit is paired with a
//! [`ProofVerifier`] predicate that is handed the proof bytes and the public
//! inputs in a fixed order:
//!
//! | circuit  | public inputs                                          |
//! |----------|--------------------------------------------------------|
//! | shield   | `[amount, asset_id, commitment]`                       |
//! | transfer | `[root, nullifier_hash, new_commitment, asset_id]`     |
//! | unshield | `[root, nullifier_hash, amount, asset_id, recipient]`  |

use std::fmt;
use std::sync::Arc;

use cloak_hash::FieldElement;
use serde::{Deserialize, Serialize};

use crate::asset::AssetId;
use crate::types::{Address, Amount, Proof};

/// The three state-transition circuits
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Circuit {
    Shield,
    Transfer,
    Unshield,
}

impl Circuit {
    fn tag(&self) -> &'static [u8] {
        match self {
            Circuit::Shield => b"cloak/proof/shield",
            Circuit::Transfer => b"cloak/proof/transfer",
            Circuit::Unshield => b"cloak/proof/unshield",
        }
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Circuit::Shield => f.write_str("shield"),
            Circuit::Transfer => f.write_str("transfer"),
            Circuit::Unshield => f.write_str("unshield"),
        }
    }
}

/// Boolean predicate over a proof and its public inputs
pub trait ProofVerifier: Send + Sync {
    fn verify(&self, proof: &Proof, public_inputs: &[FieldElement]) -> bool;
}

impl<F> ProofVerifier for F
where
    F: Fn(&Proof, &[FieldElement]) -> bool + Send + Sync,
{
    fn verify(&self, proof: &Proof, public_inputs: &[FieldElement]) -> bool {
        self(proof, public_inputs)
    }
}

/// One verifier per circuit
#[derive(Clone)]
pub struct VerifierSet {
    pub shield: Arc<dyn ProofVerifier>,
    pub transfer: Arc<dyn ProofVerifier>,
    pub unshield: Arc<dyn ProofVerifier>,
}

impl VerifierSet {
    pub fn new(
        shield: Arc<dyn ProofVerifier>,
        transfer: Arc<dyn ProofVerifier>,
        unshield: Arc<dyn ProofVerifier>,
    ) -> Self {
        Self {
            shield,
            transfer,
            unshield,
        }
    }

    /// The same predicate for every circuit
    pub fn uniform(verifier: Arc<dyn ProofVerifier>) -> Self {
        Self::new(verifier.clone(), verifier.clone(), verifier)
    }

    /// Development set accepting any proof
    pub fn accept_all() -> Self {
        Self::uniform(Arc::new(AcceptAllVerifier))
    }

    /// Development set requiring [`Proof::digest`] proofs
    pub fn digest() -> Self {
        Self::new(
            Arc::new(DigestVerifier::new(Circuit::Shield)),
            Arc::new(DigestVerifier::new(Circuit::Transfer)),
            Arc::new(DigestVerifier::new(Circuit::Unshield)),
        )
    }

    pub fn verify(&self, circuit: Circuit, proof: &Proof, public_inputs: &[FieldElement]) -> bool {
        let verifier = match circuit {
            Circuit::Shield => &self.shield,
            Circuit::Transfer => &self.transfer,
            Circuit::Unshield => &self.unshield,
        };
        verifier.verify(proof, public_inputs)
    }
}

impl fmt::Debug for VerifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifierSet").finish_non_exhaustive()
    }
}

pub fn shield_inputs(amount: Amount, asset_id: AssetId, commitment: FieldElement) -> Vec<FieldElement> {
    vec![FieldElement::from_u128(amount), asset_id, commitment]
}

pub fn transfer_inputs(
    root: FieldElement,
    nullifier_hash: FieldElement,
    new_commitment: FieldElement,
    asset_id: AssetId,
) -> Vec<FieldElement> {
    vec![root, nullifier_hash, new_commitment, asset_id]
}

pub fn unshield_inputs(
    root: FieldElement,
    nullifier_hash: FieldElement,
    amount: Amount,
    asset_id: AssetId,
    recipient: Address,
) -> Vec<FieldElement> {
    vec![
        root,
        nullifier_hash,
        FieldElement::from_u128(amount),
        asset_id,
        recipient.to_field(),
    ]
}

/// Accepts every proof. Never use outside development.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAllVerifier;

impl ProofVerifier for AcceptAllVerifier {
    fn verify(&self, _proof: &Proof, _public_inputs: &[FieldElement]) -> bool {
        true
    }
}

/// Accepts exactly the BLAKE3 digest of the circuit tag and public inputs
///
/// Binds a proof to its inputs without any circuit, so tests can tell apart
/// a proof for the right statement from one for a different statement.
#[derive(Clone, Copy, Debug)]
pub struct DigestVerifier {
    circuit: Circuit,
}

impl DigestVerifier {
    pub fn new(circuit: Circuit) -> Self {
        Self { circuit }
    }
}

impl ProofVerifier for DigestVerifier {
    fn verify(&self, proof: &Proof, public_inputs: &[FieldElement]) -> bool {
        proof == &Proof::digest(self.circuit, public_inputs)
    }
}

impl Proof {
    /// Proof accepted by [`DigestVerifier`] for `circuit` over `public_inputs`
    pub fn digest(circuit: Circuit, public_inputs: &[FieldElement]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(circuit.tag());
        for input in public_inputs {
            hasher.update(input.as_bytes());
        }
        Proof::new(hasher.finalize().as_bytes().to_vec())
    }
}
