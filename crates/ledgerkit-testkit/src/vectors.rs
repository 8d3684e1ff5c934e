//! Golden hash vectors.
//!
//! Each vector pins the canonical frame and the SHA-256 digest of one
//! value. A change to either is a breaking change to stored hashes.

use std::collections::BTreeMap;

use serde_json::json;

use ledgerkit_core::{serialize, Result, Sha256Hash};

use crate::fixtures::SampleAsset;

/// A golden hash vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Expected canonical frame (hex).
    pub expected_frame: &'static str,
    /// Expected digest (hex).
    pub expected_hash: &'static str,
    encode: fn() -> Result<Vec<u8>>,
}

impl GoldenVector {
    /// Canonical frame for this vector's input.
    pub fn frame(&self) -> Result<Vec<u8>> {
        (self.encode)()
    }

    /// Digest of the frame, as lowercase hex.
    pub fn hash(&self) -> Result<String> {
        Ok(Sha256Hash::hash(&self.frame()?).to_hex())
    }
}

/// Get all golden vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "unsigned integer",
            expected_frame: "820107",
            expected_hash: "f688797335cdbc1deea7665423570383f0607b4dc4370ff9cd85c9865f21a634",
            encode: || serialize(&7u32),
        },
        GoldenVector {
            name: "negative integer",
            expected_frame: "820120",
            expected_hash: "803b053b3650400f6860faf70d1c42a2364e675aa73950f913e32e28d9d0ce14",
            encode: || serialize(&-1i64),
        },
        GoldenVector {
            name: "text",
            expected_frame: "82016568656c6c6f",
            expected_hash: "f460c00ce40f3a7c3ad84c041c5fccfb93083c6415853d55c0213877db0badfd",
            encode: || serialize("hello"),
        },
        GoldenVector {
            name: "float",
            expected_frame: "8201fb3ff8000000000000",
            expected_hash: "0dbfbf57a11a7bab0bc588398ec804099079183c6158c7b4cc3f2cc8c005978e",
            encode: || serialize(&1.5f64),
        },
        GoldenVector {
            name: "absent",
            expected_frame: "8201f6",
            expected_hash: "6a7446563d3f03a03e08e917b62887735f617f8b8178c788b2a3b09140dde723",
            encode: || serialize(&Option::<u32>::None),
        },
        GoldenVector {
            name: "empty sequence",
            expected_frame: "820180",
            expected_hash: "caf5b36572ad183670eecdb1f6ec9ade2ad49bf97ff99bfe92fa23260b46fbf1",
            encode: || serialize(&Vec::<String>::new()),
        },
        GoldenVector {
            name: "record",
            expected_frame: "8201a36269646761737365742d31656f776e657265616c6963656576616c75651864",
            expected_hash: "46e9b5f5882a688710d851033af4ec533e3e3a59db9eeb1350736449abd5f9cb",
            encode: || serialize(&SampleAsset::new("asset-1", "alice", 100)),
        },
        GoldenVector {
            name: "record as map",
            expected_frame: "8201a36269646761737365742d31656f776e657265616c6963656576616c75651864",
            expected_hash: "46e9b5f5882a688710d851033af4ec533e3e3a59db9eeb1350736449abd5f9cb",
            encode: || {
                let mut map = BTreeMap::new();
                map.insert("value", json!(100));
                map.insert("owner", json!("alice"));
                map.insert("id", json!("asset-1"));
                serialize(&map)
            },
        },
        GoldenVector {
            name: "nested document",
            expected_frame: "8201a2646d657461a26161f6617a0164746167738261616162",
            expected_hash: "d879642cf6b0a4d1bd566a0179790f519e744a8bd055de495f34db4ed51bb012",
            encode: || serialize(&json!({"tags": ["a", "b"], "meta": {"z": 1, "a": null}})),
        },
    ]
}

/// Check every vector, returning `(name, matches, actual hash)`.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let frame = v.frame().map(hex::encode).unwrap_or_default();
            let hash = v.hash().unwrap_or_default();
            let matches = frame == v.expected_frame && hash == v.expected_hash;
            (v.name.to_string(), matches, hash)
        })
        .collect()
}
