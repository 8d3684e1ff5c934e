//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use ledgerkit_core::{required_fields, TxTimestamp};
use ledgerkit_store::{MemoryContext, MemoryLedger, StoreError, TransactionContext};

/// A small record used across tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleAsset {
    pub id: String,
    pub owner: String,
    pub value: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

required_fields!(SampleAsset {
    #[required] id,
    #[required] owner,
    value,
    tags,
});

impl SampleAsset {
    pub fn new(id: impl Into<String>, owner: impl Into<String>, value: u64) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            value,
            tags: Vec::new(),
        }
    }

    /// Ledger key this asset is stored under by the fixtures.
    pub fn key(&self) -> String {
        format!("asset-{}", self.id)
    }
}

/// A test fixture around a fresh in-memory ledger.
pub struct TestFixture {
    pub ledger: Arc<MemoryLedger>,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            ledger: MemoryLedger::new(),
        }
    }

    /// Open a context with a random transaction id and the current time.
    pub fn context(&self) -> MemoryContext {
        self.ledger.context(random_tx_id(), now())
    }

    /// Open a context with a fixed id and timestamp.
    pub fn context_at(&self, tx_id: &str, seconds: i64) -> MemoryContext {
        self.ledger.context(tx_id, TxTimestamp::new(seconds, 0))
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Build `count` assets owned alternately by alice and bob.
pub fn sample_assets(count: usize) -> Vec<SampleAsset> {
    (0..count)
        .map(|i| {
            let owner = if i % 2 == 0 { "alice" } else { "bob" };
            SampleAsset::new(format!("{:03}", i), owner, (i as u64 + 1) * 10)
        })
        .collect()
}

/// Write `assets` as JSON through any context.
pub fn seed_assets<C>(ctx: &C, assets: &[SampleAsset]) -> Result<(), StoreError>
where
    C: TransactionContext + ?Sized,
{
    for asset in assets {
        let json = serde_json::to_vec(asset)
            .map_err(|e| StoreError::Unavailable(format!("fixture encoding: {}", e)))?;
        ctx.put_state(&asset.key(), &json)?;
    }
    Ok(())
}

/// A 16-character alphanumeric transaction id.
pub fn random_tx_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

fn now() -> TxTimestamp {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    TxTimestamp::new(elapsed.as_secs() as i64, elapsed.subsec_nanos() as i32)
}
