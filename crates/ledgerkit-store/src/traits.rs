//! Transaction context traits: the interface to the external ledger.
//!
//! ledgerkit never talks to a ledger directly. Every operation receives a
//! [`TransactionContext`] for the current transaction and goes through it.
//! Implementations include an in-memory ledger (tests) and SQLite (local
//! development).

use bytes::Bytes;
use ledgerkit_core::TxTimestamp;

use crate::error::Result;

/// One (key, raw value) pair produced by a query cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRecord {
    pub key: String,
    pub value: Bytes,
}

impl QueryRecord {
    pub fn new(key: impl Into<String>, value: impl Into<Bytes>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// An ordered, closable result cursor.
///
/// Records are yielded in ledger order. A cursor holds ledger-side
/// resources until [`close`](QueryCursor::close) is called; callers must
/// close it on every exit path, including errors.
pub trait QueryCursor: Iterator<Item = Result<QueryRecord>> {
    /// Release the cursor. Closing twice is a no-op.
    fn close(&mut self) -> Result<()>;
}

/// The per-invocation handle onto the ledger and transaction metadata.
///
/// # Design Notes
///
/// - **Missing keys**: `get_state` returns `Ok(None)`, not an error.
/// - **Idempotent deletes**: deleting a missing key succeeds.
/// - **Read-your-writes**: a put is visible to later reads through the
///   same context.
pub trait TransactionContext: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // State Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Read the raw bytes stored under `key`.
    fn get_state(&self, key: &str) -> Result<Option<Bytes>>;

    /// Write raw bytes under `key`, replacing any previous value.
    fn put_state(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Delete the entry under `key`.
    fn del_state(&self, key: &str) -> Result<()>;

    /// Check if an entry exists.
    fn has_state(&self, key: &str) -> Result<bool> {
        Ok(self.get_state(key)?.is_some())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Run a rich (selector) query.
    fn get_query_result(&self, query: &str) -> Result<Box<dyn QueryCursor + '_>>;

    /// Iterate keys in `[start, end)`. An empty `end` means no upper bound.
    fn get_state_by_range(&self, start: &str, end: &str) -> Result<Box<dyn QueryCursor + '_>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Transaction Metadata
    // ─────────────────────────────────────────────────────────────────────────

    /// Identifier of the current transaction.
    fn tx_id(&self) -> &str;

    /// Timestamp of the current transaction.
    fn tx_timestamp(&self) -> Result<TxTimestamp>;
}
