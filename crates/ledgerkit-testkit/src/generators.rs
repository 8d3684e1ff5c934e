//! Proptest generators for property-based testing.

use std::collections::BTreeMap;

use proptest::prelude::*;

use crate::fixtures::SampleAsset;

/// A key that passes validation.
pub fn ledger_key() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9:_-]{0,31}"
}

/// A key made only of whitespace, including the empty key.
pub fn blank_key() -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof![Just(' '), Just('\t'), Just('\n')], 0..8)
        .prop_map(|chars| chars.into_iter().collect())
}

/// Owner names drawn from a small pool so selector queries hit.
pub fn owner() -> impl Strategy<Value = String> {
    prop_oneof![Just("alice"), Just("bob"), Just("carol")].prop_map(String::from)
}

/// A complete asset.
pub fn sample_asset() -> impl Strategy<Value = SampleAsset> {
    (
        "[0-9]{3}",
        owner(),
        0u64..10_000,
        prop::collection::vec("[a-z]{1,6}", 0..3),
    )
        .prop_map(|(id, owner, value, tags)| SampleAsset {
            id,
            owner,
            value,
            tags,
        })
}

/// Assets with unique ids, in id order.
pub fn asset_set(max: usize) -> impl Strategy<Value = Vec<SampleAsset>> {
    prop::collection::vec(sample_asset(), 0..=max).prop_map(|assets| {
        let unique: BTreeMap<String, SampleAsset> =
            assets.into_iter().map(|a| (a.id.clone(), a)).collect();
        unique.into_values().collect()
    })
}

/// A flat string-to-integer record.
pub fn flat_record() -> impl Strategy<Value = BTreeMap<String, i64>> {
    prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..8)
}
