//! CLOAK Hash Functions
//!
//! - [`FieldElement`]: the 32-byte big-endian value every ledger input travels as
//! - Poseidon: ZK-friendly algebraic hash used by the commitment accumulator
//! - BLAKE3: domain-separated seeds and identifier derivation

pub mod errors;
pub mod field;
pub mod oracle;
pub mod poseidon;

pub use errors::HashError;
pub use field::FieldElement;
pub use oracle::{Blake3Oracle, HashOracle, PoseidonOracle};
pub use poseidon::{poseidon_hash_two, PoseidonHasher, PoseidonParams};

