//! Field elements over the BN254 scalar field
//!
//! Commitments, nullifiers, roots and asset ids all travel through the ledger
//! as [`FieldElement`]s: 32 bytes in big-endian order. The ledger never
//! re-encodes them, so a value that is not canonical (>= the modulus) is
//! carried byte-exact until a verifier or hash oracle interprets it.

use std::fmt;

use ark_bn254::Fr;
use ark_ff::{BigInt, BigInteger, PrimeField};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::HashError;

/// A 32-byte big-endian encoding of a BN254 scalar field element
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FieldElement([u8; 32]);

impl FieldElement {
    /// Encoded size in bytes
    pub const BYTES: usize = 32;

    /// The zero element, used as a sentinel by the accumulator
    pub const ZERO: Self = Self([0u8; 32]);

    /// Wrap raw big-endian bytes without any reduction
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Consume into the underlying bytes
    pub fn to_bytes(self) -> [u8; 32] {
        self.0
    }

    pub fn from_u64(value: u64) -> Self {
        Self::from_u128(value as u128)
    }

    /// Encode an integer amount (always canonical, since 2^128 < p)
    pub fn from_u128(value: u128) -> Self {
        let mut bytes = [0u8; 32];
        bytes[16..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Decode as an integer if the upper 16 bytes are zero
    pub fn to_u128(&self) -> Option<u128> {
        if self.0[..16].iter().any(|b| *b != 0) {
            return None;
        }
        let mut low = [0u8; 16];
        low.copy_from_slice(&self.0[16..]);
        Some(u128::from_be_bytes(low))
    }

    /// Left-pad a 20-byte account identifier into a field element
    pub fn from_address_bytes(address: &[u8; 20]) -> Self {
        let mut bytes = [0u8; 32];
        bytes[12..].copy_from_slice(address);
        Self(bytes)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Whether the encoding is strictly below the field modulus
    pub fn is_canonical(&self) -> bool {
        self.to_fr().is_some()
    }

    /// Interpret as a field element, rejecting non-canonical encodings
    pub fn to_fr(&self) -> Option<Fr> {
        let mut limbs = [0u64; 4];
        for (i, limb) in limbs.iter_mut().enumerate() {
            let start = 32 - (i + 1) * 8;
            let mut chunk = [0u8; 8];
            chunk.copy_from_slice(&self.0[start..start + 8]);
            *limb = u64::from_be_bytes(chunk);
        }
        Fr::from_bigint(BigInt::new(limbs))
    }

    /// Interpret as a field element, reducing modulo p
    pub fn to_fr_reduced(&self) -> Fr {
        Fr::from_be_bytes_mod_order(&self.0)
    }

    pub fn from_fr(element: &Fr) -> Self {
        let be = element.into_bigint().to_bytes_be();
        let mut bytes = [0u8; 32];
        bytes[32 - be.len()..].copy_from_slice(&be);
        Self(bytes)
    }

    /// Reduce arbitrary big-endian bytes into the field
    pub fn reduce(bytes: &[u8]) -> Self {
        Self::from_fr(&Fr::from_be_bytes_mod_order(bytes))
    }

    /// Domain-separated BLAKE3 hash of `data`, reduced into the field
    pub fn hash_to_field(domain: &[u8], data: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(domain);
        hasher.update(data);
        Self::reduce(hasher.finalize().as_bytes())
    }

    /// `0x`-prefixed lowercase hex
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse 64 hex characters, with or without a `0x` prefix
    pub fn from_hex(s: &str) -> Result<Self, HashError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|e| HashError::InvalidHex(e.to_string()))?;

        if bytes.len() != Self::BYTES {
            return Err(HashError::InvalidLength {
                expected: Self::BYTES,
                got: bytes.len(),
            });
        }

        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Parse hex and require a canonical encoding
    pub fn from_hex_canonical(s: &str) -> Result<Self, HashError> {
        let element = Self::from_hex(s)?;
        if !element.is_canonical() {
            return Err(HashError::NonCanonical(element.to_hex()));
        }
        Ok(element)
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<u128> for FieldElement {
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

impl From<Fr> for FieldElement {
    fn from(element: Fr) -> Self {
        Self::from_fr(&element)
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({})", self.to_hex())
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for FieldElement {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct HexVisitor;

        impl de::Visitor<'_> for HexVisitor {
            type Value = FieldElement;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a 32-byte hex string (with or without 0x prefix)")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                FieldElement::from_hex(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(HexVisitor)
    }
}
