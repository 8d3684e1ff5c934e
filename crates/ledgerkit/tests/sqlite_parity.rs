//! The SQLite ledger must behave exactly like the in-memory ledger for
//! every ledgerkit operation.

use proptest::prelude::*;
use tempfile::tempdir;

use ledgerkit::core::TxTimestamp;
use ledgerkit::store::{MemoryLedger, SqliteLedger};
use ledgerkit::{
    del_data, get_data, get_return, query_list, query_range, save_data, Payload,
    TransactionContext,
};
use ledgerkit_testkit::{asset_set, sample_assets, seed_assets, SampleAsset};

const QUERIES: &[&str] = &[
    r#"{"selector":{}}"#,
    r#"{"selector":{"owner":"alice"}}"#,
    r#"{"selector":{"value":{"$gte":20,"$lt":50}}}"#,
    r#"{"selector":{"$or":[{"owner":"bob"},{"value":10}]}}"#,
    r#"{"selector":{"owner":{"$in":["carol","bob"]}},"limit":1}"#,
    r#"{"selector":{"owner":{"$ne":"alice"}},"skip":1}"#,
    r#"{"selector":{"tags":{"$exists":true}}}"#,
];

fn keys_of<C: TransactionContext + ?Sized>(ctx: &C, query: &str) -> Option<Vec<String>> {
    query_list(ctx, query, |_, key| Ok(key.to_string())).unwrap()
}

fn run_all<C: TransactionContext + ?Sized>(ctx: &C) -> Vec<Option<Vec<String>>> {
    let mut out: Vec<_> = QUERIES.iter().map(|q| keys_of(ctx, q)).collect();
    out.push(query_range(ctx, "asset-001", "asset-004", |_, k| Ok(k.to_string())).unwrap());
    out.push(query_range(ctx, "asset-003", "", |_, k| Ok(k.to_string())).unwrap());
    out
}

#[test]
fn queries_agree() {
    let dir = tempdir().unwrap();
    let sqlite = SqliteLedger::open(dir.path().join("parity.db")).unwrap();
    let memory = MemoryLedger::new();

    let ts = TxTimestamp::new(1_700_000_000, 0);
    let sctx = sqlite.context("tx-parity", ts);
    let mctx = memory.context("tx-parity", ts);

    let assets = sample_assets(6);
    seed_assets(&sctx, &assets).unwrap();
    seed_assets(&mctx, &assets).unwrap();

    assert_eq!(run_all(&sctx), run_all(&mctx));
    assert_eq!(sqlite.open_cursors(), 0);
    assert_eq!(memory.open_cursors(), 0);
}

#[test]
fn accessor_agrees() {
    let sqlite = SqliteLedger::open_memory().unwrap();
    let memory = MemoryLedger::new();
    let ts = TxTimestamp::new(5, 0);
    let contexts: Vec<Box<dyn TransactionContext>> = vec![
        Box::new(sqlite.context("tx-a", ts)),
        Box::new(memory.context("tx-a", ts)),
    ];

    let results: Vec<_> = contexts
        .iter()
        .map(|ctx| {
            let ctx = ctx.as_ref();
            let asset = SampleAsset::new("009", "carol", 90);
            save_data(ctx, "asset-009", &asset).unwrap();
            let first = get_data(ctx, "asset-009").unwrap();
            del_data(ctx, "asset-009").unwrap();
            del_data(ctx, "asset-009").unwrap();
            let second = get_data(ctx, "asset-009").unwrap();
            let env = get_return(ctx, "ok", Payload::from_option(first.clone())).unwrap();
            (first, second, env.count(), env.tx_time())
        })
        .collect();

    assert_eq!(results[0], results[1]);
    assert!(results[0].0.is_some());
    assert!(results[0].1.is_none());
}

#[test]
fn data_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("reopen.db");
    {
        let ledger = SqliteLedger::open(&path).unwrap();
        let ctx = ledger.context("tx-1", TxTimestamp::new(1, 0));
        save_data(&ctx, "asset-001", &SampleAsset::new("001", "alice", 10)).unwrap();
    }

    let ledger = SqliteLedger::open(&path).unwrap();
    let ctx = ledger.context("tx-2", TxTimestamp::new(2, 0));
    let found = keys_of(&ctx, r#"{"selector":{"owner":"alice"}}"#);
    assert_eq!(found, Some(vec!["asset-001".to_string()]));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn random_sets_agree(assets in asset_set(10)) {
        let sqlite = SqliteLedger::open_memory().unwrap();
        let memory = MemoryLedger::new();
        let ts = TxTimestamp::new(1, 0);
        let sctx = sqlite.context("tx", ts);
        let mctx = memory.context("tx", ts);
        seed_assets(&sctx, &assets).unwrap();
        seed_assets(&mctx, &assets).unwrap();

        prop_assert_eq!(run_all(&sctx), run_all(&mctx));
    }
}
