//! # ledgerkit
//!
//! A thin utility layer over a transactional key-value ledger.
//!
//! ## Overview
//!
//! Operation handlers receive a [`TransactionContext`] for the current
//! transaction and use ledgerkit to:
//!
//! - **Access** single entries by key ([`get_data`], [`save_data`], [`del_data`])
//! - **Query** with a per-record transform ([`query_list`], [`query_range`])
//! - **Respond** with a counted, transaction-stamped envelope ([`get_return`])
//! - **Check** required fields ([`check_required`]) and **hash** records ([`hash`])
//!
//! ## Usage
//!
//! ```rust
//! use ledgerkit::{get_data, get_return, query_list, save_data, Payload};
//! use ledgerkit::core::TxTimestamp;
//! use ledgerkit::store::MemoryLedger;
//!
//! let ledger = MemoryLedger::new();
//! let ctx = ledger.context("tx-1", TxTimestamp::new(1_700_000_000, 0));
//!
//! save_data(&ctx, "asset-1", &serde_json::json!({"owner": "alice"})).unwrap();
//! assert!(get_data(&ctx, "asset-1").unwrap().is_some());
//!
//! let keys = query_list(&ctx, r#"{"selector":{"owner":"alice"}}"#, |_, key| {
//!     Ok(key.to_string())
//! })
//! .unwrap();
//!
//! let envelope = get_return(&ctx, "查询成功", keys).unwrap();
//! assert_eq!(envelope.count(), 1);
//! ```
//!
//! ## Re-exports
//!
//! - `ledgerkit::core` - Validation, hashing, required fields, envelopes
//! - `ledgerkit::store` - Transaction context trait and bundled ledgers

pub mod accessor;
pub mod contract;
pub mod query;
pub mod response;

pub use ledgerkit_core as core;
pub use ledgerkit_store as store;

pub use accessor::{del_data, get_data, get_record, save_data, save_record, string_to_bytes, DataInput};
pub use contract::{Contract, ContractConfig, DEFAULT_VERSION};
pub use query::{query_list, query_range, CursorGuard};
pub use response::get_return;

pub use ledgerkit_core::{
    check_key_valid, check_key_valid_named, check_required, hash, required_fields, serialize,
    Error, LedgerKey, Payload, ResponseEnvelope, Result, Sha256Hash, Validatable,
};
pub use ledgerkit_store::{QueryCursor, QueryRecord, TransactionContext};
