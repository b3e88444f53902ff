//! Poseidon Hash over BN254
//!
//! ZK-friendly algebraic hash built on the arkworks sponge. The accumulator
//! only needs the two-to-one compression, exposed through
//! [`crate::PoseidonOracle`].
//!
//! Round constants are expanded from a BLAKE3 XOF under a fixed context string
//! and the MDS matrix is a Cauchy matrix, so the parameter set is reproducible
//! from this file alone. A deployment whose circuits use a different Poseidon
//! instance must inject a matching oracle instead.

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::poseidon::{PoseidonConfig, PoseidonSponge};
use ark_crypto_primitives::sponge::CryptographicSponge;
use ark_ff::{Field, PrimeField};
use ark_std::vec::Vec;

/// Width of the permutation (rate 2, capacity 1)
pub const POSEIDON_T: usize = 3;
pub const POSEIDON_RATE: usize = 2;
pub const POSEIDON_CAPACITY: usize = 1;
pub const POSEIDON_FULL_ROUNDS: usize = 8;
pub const POSEIDON_PARTIAL_ROUNDS: usize = 57;
/// S-box exponent x^5
pub const POSEIDON_ALPHA: u64 = 5;

const ROUND_CONSTANT_CONTEXT: &str = "cloak poseidon bn254 t3 round constants v1";

/// Poseidon parameters for the BN254 scalar field
#[derive(Clone)]
pub struct PoseidonParams {
    config: PoseidonConfig<Fr>,
}

impl PoseidonParams {
    pub fn new() -> Self {
        Self {
            config: Self::default_config(),
        }
    }

    pub fn config(&self) -> &PoseidonConfig<Fr> {
        &self.config
    }

    fn default_config() -> PoseidonConfig<Fr> {
        let rounds = POSEIDON_FULL_ROUNDS + POSEIDON_PARTIAL_ROUNDS;

        let mut reader = blake3::Hasher::new_derive_key(ROUND_CONSTANT_CONTEXT).finalize_xof();
        let ark: Vec<Vec<Fr>> = (0..rounds)
            .map(|_| {
                (0..POSEIDON_T)
                    .map(|_| {
                        // 64 bytes per constant keeps the modular bias negligible
                        let mut wide = [0u8; 64];
                        reader.fill(&mut wide);
                        Fr::from_le_bytes_mod_order(&wide)
                    })
                    .collect()
            })
            .collect();

        // Cauchy matrix: x_i + y_j is never zero, so every entry is invertible
        let mds: Vec<Vec<Fr>> = (0..POSEIDON_T)
            .map(|i| {
                (0..POSEIDON_T)
                    .map(|j| {
                        let x = Fr::from(i as u64);
                        let y = Fr::from((POSEIDON_T + j) as u64);
                        (x + y).inverse().unwrap_or(Fr::from(1u64))
                    })
                    .collect()
            })
            .collect();

        PoseidonConfig::new(
            POSEIDON_FULL_ROUNDS,
            POSEIDON_PARTIAL_ROUNDS,
            POSEIDON_ALPHA,
            mds,
            ark,
            POSEIDON_RATE,
            POSEIDON_CAPACITY,
        )
    }
}

impl Default for PoseidonParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Stateful Poseidon sponge
pub struct PoseidonHasher {
    sponge: PoseidonSponge<Fr>,
}

impl PoseidonHasher {
    pub fn new() -> Self {
        Self::with_params(&PoseidonParams::new())
    }

    pub fn with_params(params: &PoseidonParams) -> Self {
        Self {
            sponge: PoseidonSponge::new(params.config()),
        }
    }

    pub fn absorb(&mut self, element: &Fr) {
        self.sponge.absorb(element);
    }

    pub fn squeeze(&mut self) -> Fr {
        self.sponge.squeeze_field_elements::<Fr>(1)[0]
    }

    pub fn finalize(mut self) -> Fr {
        self.squeeze()
    }
}

impl Default for PoseidonHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Two-to-one compression with explicit parameters
pub fn poseidon_hash_two_with(params: &PoseidonParams, left: &Fr, right: &Fr) -> Fr {
    let mut hasher = PoseidonHasher::with_params(params);
    hasher.absorb(left);
    hasher.absorb(right);
    hasher.finalize()
}

/// Two-to-one compression (for Merkle trees)
pub fn poseidon_hash_two(left: &Fr, right: &Fr) -> Fr {
    poseidon_hash_two_with(&PoseidonParams::new(), left, right)
}
