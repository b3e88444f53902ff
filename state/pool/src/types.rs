//! Value types shared by every ledger operation

use std::fmt;

use cloak_hash::FieldElement;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::PoolError;

/// Base units of an asset
pub type Amount = u128;

/// Coarse, externally supplied time bucket (e.g. a block number)
pub type WindowId = u64;

/// A 20-byte external account or token identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; 20]);

impl Address {
    /// The null identifier
    pub const ZERO: Self = Self([0u8; 20]);

    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_null(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Left-padded field encoding used in public inputs
    pub fn to_field(&self) -> FieldElement {
        FieldElement::from_address_bytes(&self.0)
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    pub fn from_hex(s: &str) -> Result<Self, PoolError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits)
            .map_err(|e| PoolError::InvalidAddress(format!("{}: {}", s, e)))?;

        if bytes.len() != 20 {
            return Err(PoolError::InvalidAddress(format!(
                "expected 20 bytes, got {}",
                bytes.len()
            )));
        }

        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Address::from_hex(&s).map_err(de::Error::custom)
    }
}

/// Which commitment scheme a pool instance serves
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PoolVariant {
    /// Secret-based commitments, no payload on shield
    #[default]
    Plain,
    /// Viewing-key commitments, shield carries an encrypted note payload
    Stealth,
}

impl fmt::Display for PoolVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolVariant::Plain => f.write_str("plain"),
            PoolVariant::Stealth => f.write_str("stealth"),
        }
    }
}

/// Opaque proof bytes handed to the verifier predicate
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Proof(Vec<u8>);

impl Proof {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Proof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Proof({} bytes)", self.0.len())
    }
}

impl From<Vec<u8>> for Proof {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Encrypted note payload for stealth recipients, passed through untouched
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StealthPayload(Vec<u8>);

impl StealthPayload {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Caller identity and externally supplied time for one operation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    pub caller: Address,
    pub window: WindowId,
    pub timestamp: u64,
}

impl CallContext {
    pub fn new(caller: Address, window: WindowId, timestamp: u64) -> Self {
        Self {
            caller,
            window,
            timestamp,
        }
    }
}

/// Serde helpers encoding `u128` amounts as decimal strings
///
/// TOML integers are 64-bit, so amounts in config files are written as
/// strings. Deserialization also accepts plain integers.
pub mod amount_string {
    use std::fmt;

    use serde::{de, Deserializer, Serializer};

    use super::Amount;

    pub fn serialize<S>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&amount.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Amount, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }

    pub(super) struct AmountVisitor;

    impl de::Visitor<'_> for AmountVisitor {
        type Value = Amount;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a non-negative integer or decimal string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
            Ok(v as Amount)
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<Amount, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
            Amount::try_from(v).map_err(|_| E::custom(format!("negative amount {}", v)))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
            v.replace('_', "")
                .parse::<Amount>()
                .map_err(|e| E::custom(format!("invalid amount {:?}: {}", v, e)))
        }
    }

    /// Same encoding for a list of amounts
    pub mod list {
        use std::fmt;

        use serde::de::{self, SeqAccess};
        use serde::ser::SerializeSeq;
        use serde::{Deserializer, Serializer};

        use super::super::Amount;

        pub fn serialize<S>(amounts: &[Amount], serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let mut seq = serializer.serialize_seq(Some(amounts.len()))?;
            for amount in amounts {
                seq.serialize_element(&amount.to_string())?;
            }
            seq.end()
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Amount>, D::Error>
        where
            D: Deserializer<'de>,
        {
            struct ListVisitor;

            impl<'de> de::Visitor<'de> for ListVisitor {
                type Value = Vec<Amount>;

                fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    f.write_str("a list of amounts")
                }

                fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
                where
                    A: SeqAccess<'de>,
                {
                    let mut out = Vec::new();
                    while let Some(Wrapped(amount)) = seq.next_element::<Wrapped>()? {
                        out.push(amount);
                    }
                    Ok(out)
                }
            }

            deserializer.deserialize_seq(ListVisitor)
        }

        struct Wrapped(Amount);

        impl<'de> serde::Deserialize<'de> for Wrapped {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer
                    .deserialize_any(super::AmountVisitor)
                    .map(Wrapped)
            }
        }
    }
}
