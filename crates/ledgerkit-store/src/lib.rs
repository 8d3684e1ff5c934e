//! # ledgerkit Store
//!
//! The transaction context abstraction: everything ledgerkit needs from the
//! host ledger, behind the [`TransactionContext`] trait, plus two bundled
//! ledgers.
//!
//! ## Key Types
//!
//! - [`TransactionContext`] - State access, queries and transaction metadata
//! - [`QueryCursor`] - Ordered, closable result cursor
//! - [`MemoryLedger`] / [`MemoryContext`] - In-memory ledger with fail points for tests
//! - [`SqliteLedger`] / [`SqliteContext`] - Persistent SQLite ledger
//! - [`RichQuery`] - Selector query evaluation shared by both ledgers
//!
//! ## Usage
//!
//! ```rust
//! use ledgerkit_core::TxTimestamp;
//! use ledgerkit_store::{MemoryLedger, QueryCursor, TransactionContext};
//!
//! let ledger = MemoryLedger::new();
//! let ctx = ledger.context("tx-1", TxTimestamp::new(1_700_000_000, 0));
//!
//! ctx.put_state("asset-1", br#"{"owner":"alice"}"#).unwrap();
//!
//! let mut cursor = ctx.get_query_result(r#"{"selector":{"owner":"alice"}}"#).unwrap();
//! let first = cursor.next().unwrap().unwrap();
//! assert_eq!(first.key, "asset-1");
//! cursor.close().unwrap();
//! ```

pub mod cursor;
pub mod error;
pub mod memory;
pub mod migration;
pub mod selector;
pub mod sqlite;
pub mod traits;

pub use cursor::{CursorTracker, SnapshotCursor};
pub use error::{Result, StoreError};
pub use memory::{FailPoint, MemoryContext, MemoryLedger};
pub use selector::RichQuery;
pub use sqlite::{SqliteContext, SqliteLedger};
pub use traits::{QueryCursor, QueryRecord, TransactionContext};
