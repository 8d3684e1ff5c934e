//! SHA-256 content hashing.
//!
//! Content hashes are taken over the canonical encoding from
//! [`crate::canonical`], never over the JSON bytes stored in the ledger.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::canonical::serialize;
use crate::error::{Error, Result};

/// A 32-byte SHA-256 hash.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Sha256Hash(pub [u8; 32]);

impl Sha256Hash {
    /// Compute the SHA-256 hash of the given data.
    pub fn hash(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Hash the canonical encoding of a structured value.
    pub fn of<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Self::hash(&serialize(value)?))
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| Error::serialization(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| Error::serialization("invalid sha-256 length"))?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SHA256({}...)", &self.to_hex()[..8])
    }
}

impl fmt::Display for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for Sha256Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Sha256Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Lowercase hex SHA-256 of a value's canonical encoding.
pub fn hash<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(Sha256Hash::of(value)?.to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Reading {
        sensor: String,
        celsius: f64,
    }

    #[test]
    fn test_sha256_known_vector() {
        let h = Sha256Hash::hash(b"abc");
        assert_eq!(
            h.to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_hash_is_lowercase_hex() {
        let digest = hash("single").unwrap();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_equal_structures_hash_equal() {
        let a = Reading { sensor: "t-1".into(), celsius: 21.5 };
        let b = Reading { sensor: "t-1".into(), celsius: 21.5 };
        assert_eq!(hash(&a).unwrap(), hash(&b).unwrap());
    }

    #[test]
    fn test_different_structures_hash_differently() {
        let a = Reading { sensor: "t-1".into(), celsius: 21.5 };
        let b = Reading { sensor: "t-1".into(), celsius: 21.6 };
        assert_ne!(hash(&a).unwrap(), hash(&b).unwrap());
    }

    #[test]
    fn test_struct_and_equivalent_map_hash_equal() {
        let a = Reading { sensor: "t-1".into(), celsius: 21.5 };
        let mut m = BTreeMap::new();
        m.insert("celsius", serde_json::json!(21.5));
        m.insert("sensor", serde_json::json!("t-1"));
        assert_eq!(hash(&a).unwrap(), hash(&m).unwrap());
    }

    #[test]
    fn test_hex_roundtrip() {
        let h = Sha256Hash::hash(b"ledger");
        assert_eq!(Sha256Hash::from_hex(&h.to_hex()).unwrap(), h);
        assert!(Sha256Hash::from_hex("abcd").is_err());
    }
}
