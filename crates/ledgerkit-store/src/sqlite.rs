//! SQLite ledger.
//!
//! A persistent single-node ledger for local development and tests that
//! need data to survive a restart. Uses rusqlite with bundled SQLite.
//! Rich queries are evaluated in Rust over the stored JSON documents.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;
use rusqlite::{params, Connection, OptionalExtension};

use ledgerkit_core::TxTimestamp;

use crate::cursor::{CursorTracker, SnapshotCursor};
use crate::error::{Result, StoreError};
use crate::migration;
use crate::selector::RichQuery;
use crate::traits::{QueryCursor, QueryRecord, TransactionContext};

/// SQLite-backed ledger.
///
/// Thread-safe via internal Mutex. Cloning shares the connection.
#[derive(Clone)]
pub struct SqliteLedger {
    conn: Arc<Mutex<Connection>>,
    cursors: CursorTracker,
}

impl SqliteLedger {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    /// Open an in-memory SQLite database.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            cursors: CursorTracker::new(),
        }
    }

    /// Open a transaction context with the given id and timestamp.
    pub fn context(&self, tx_id: impl Into<String>, timestamp: TxTimestamp) -> SqliteContext {
        SqliteContext {
            ledger: self.clone(),
            tx_id: tx_id.into(),
            timestamp,
        }
    }

    /// Number of cursors opened and not yet closed.
    pub fn open_cursors(&self) -> usize {
        self.cursors.open_cursors()
    }

    /// Number of stored entries.
    pub fn len(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let n: i64 = conn.query_row("SELECT COUNT(*) FROM ledger_state", [], |row| row.get(0))?;
            Ok(n as usize)
        })
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.lock()?;
        f(&conn)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Poisoned(format!("sqlite connection: {}", e)))
    }

    fn scan(&self, sql: &str, bind: &[&dyn rusqlite::ToSql]) -> Result<Vec<QueryRecord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(sql)?;
            let rows = stmt.query_map(bind, |row| {
                let key: String = row.get(0)?;
                let value: Vec<u8> = row.get(1)?;
                Ok(QueryRecord::new(key, value))
            })?;
            Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
        })
    }
}

impl std::fmt::Debug for SqliteLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteLedger")
            .field("open_cursors", &self.open_cursors())
            .finish_non_exhaustive()
    }
}

/// One transaction's view of a [`SqliteLedger`].
///
/// Writes are applied immediately; there is no rollback on failure.
#[derive(Debug, Clone)]
pub struct SqliteContext {
    ledger: SqliteLedger,
    tx_id: String,
    timestamp: TxTimestamp,
}

impl SqliteContext {
    pub fn ledger(&self) -> &SqliteLedger {
        &self.ledger
    }
}

impl TransactionContext for SqliteContext {
    fn get_state(&self, key: &str) -> Result<Option<Bytes>> {
        self.ledger.with_conn(|conn| {
            let value: Option<Vec<u8>> = conn
                .query_row(
                    "SELECT value FROM ledger_state WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(value.map(Bytes::from))
        })
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<()> {
        self.ledger.with_conn(|conn| {
            conn.execute(
                "INSERT INTO ledger_state (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )?;
            Ok(())
        })
    }

    fn del_state(&self, key: &str) -> Result<()> {
        self.ledger.with_conn(|conn| {
            conn.execute("DELETE FROM ledger_state WHERE key = ?1", params![key])?;
            Ok(())
        })
    }

    fn get_query_result(&self, query: &str) -> Result<Box<dyn QueryCursor + '_>> {
        let query = RichQuery::parse(query)?;
        let all = self
            .ledger
            .scan("SELECT key, value FROM ledger_state ORDER BY key", &[])?;

        let records = query
            .filter(all.into_iter().map(|r| (r.key, r.value)))
            .into_iter()
            .map(|(k, v)| QueryRecord::new(k, v))
            .collect();

        Ok(Box::new(SnapshotCursor::open(records, &self.ledger.cursors)))
    }

    fn get_state_by_range(&self, start: &str, end: &str) -> Result<Box<dyn QueryCursor + '_>> {
        let records = if end.is_empty() {
            self.ledger.scan(
                "SELECT key, value FROM ledger_state WHERE key >= ?1 ORDER BY key",
                &[&start],
            )?
        } else {
            self.ledger.scan(
                "SELECT key, value FROM ledger_state WHERE key >= ?1 AND key < ?2 ORDER BY key",
                &[&start, &end],
            )?
        };

        Ok(Box::new(SnapshotCursor::open(records, &self.ledger.cursors)))
    }

    fn tx_id(&self) -> &str {
        &self.tx_id
    }

    fn tx_timestamp(&self) -> Result<TxTimestamp> {
        Ok(self.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn ctx(ledger: &SqliteLedger) -> SqliteContext {
        ledger.context("tx-sqlite", TxTimestamp::new(1_700_000_000, 5))
    }

    fn keys(mut cursor: Box<dyn QueryCursor + '_>) -> Vec<String> {
        let out = cursor.by_ref().map(|r| r.unwrap().key).collect();
        cursor.close().unwrap();
        out
    }

    #[test]
    fn test_put_get_overwrite_delete() {
        let ledger = SqliteLedger::open_memory().unwrap();
        let ctx = ctx(&ledger);

        assert_eq!(ctx.get_state("k").unwrap(), None);
        ctx.put_state("k", b"one").unwrap();
        ctx.put_state("k", b"two").unwrap();
        assert_eq!(ctx.get_state("k").unwrap(), Some(Bytes::from_static(b"two")));
        assert_eq!(ledger.len().unwrap(), 1);

        ctx.del_state("k").unwrap();
        ctx.del_state("k").unwrap();
        assert!(ledger.is_empty().unwrap());
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.db");
        {
            let ledger = SqliteLedger::open(&path).unwrap();
            ctx(&ledger).put_state("durable", b"yes").unwrap();
        }
        let ledger = SqliteLedger::open(&path).unwrap();
        assert_eq!(
            ctx(&ledger).get_state("durable").unwrap(),
            Some(Bytes::from_static(b"yes"))
        );
    }

    #[test]
    fn test_rich_query_and_range() {
        let ledger = SqliteLedger::open_memory().unwrap();
        let ctx = ctx(&ledger);
        ctx.put_state("p2", br#"{"owner":"bob","n":2}"#).unwrap();
        ctx.put_state("p1", br#"{"owner":"alice","n":1}"#).unwrap();
        ctx.put_state("p3", br#"{"owner":"alice","n":3}"#).unwrap();

        let q = ctx
            .get_query_result(r#"{"selector":{"owner":"alice"}}"#)
            .unwrap();
        assert_eq!(keys(q), vec!["p1", "p3"]);

        assert_eq!(keys(ctx.get_state_by_range("p1", "p3").unwrap()), vec!["p1", "p2"]);
        assert_eq!(keys(ctx.get_state_by_range("p2", "").unwrap()), vec!["p2", "p3"]);
        assert_eq!(ledger.open_cursors(), 0);
    }

    #[test]
    fn test_timestamp_and_id() {
        let ledger = SqliteLedger::open_memory().unwrap();
        let ctx = ctx(&ledger);
        assert_eq!(ctx.tx_id(), "tx-sqlite");
        assert_eq!(ctx.tx_timestamp().unwrap(), TxTimestamp::new(1_700_000_000, 5));
    }
}
