//! In-memory ledger.
//!
//! This is primarily for testing. It has the same semantics as the SQLite
//! ledger but keeps everything in memory with no persistence. Individual
//! operations can be made to fail through [`FailPoint`]s to exercise error
//! paths.

use std::collections::{BTreeMap, HashSet};
use std::ops::Bound;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::Bytes;
use ledgerkit_core::TxTimestamp;

use crate::cursor::{CursorTracker, SnapshotCursor};
use crate::error::{Result, StoreError};
use crate::selector::RichQuery;
use crate::traits::{QueryCursor, QueryRecord, TransactionContext};

/// A ledger operation that can be forced to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    GetState,
    PutState,
    DelState,
    Query,
    /// The read at this zero-based position of every later cursor.
    /// Arming a new position replaces the previous one.
    CursorRead(usize),
}

/// Shared in-memory key-value ledger.
///
/// Thread-safe via RwLock. Hand out per-transaction views with
/// [`MemoryLedger::context`].
#[derive(Debug, Default)]
pub struct MemoryLedger {
    inner: RwLock<MemoryLedgerInner>,
    cursors: CursorTracker,
}

#[derive(Debug, Default)]
struct MemoryLedgerInner {
    /// Entries in key order.
    entries: BTreeMap<String, Bytes>,

    /// Armed operation fail points.
    faults: HashSet<FailPoint>,

    /// Armed cursor read position.
    read_fault: Option<usize>,
}

impl MemoryLedger {
    /// Create a new empty ledger.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Open a transaction context with the given id and timestamp.
    pub fn context(self: &Arc<Self>, tx_id: impl Into<String>, timestamp: TxTimestamp) -> MemoryContext {
        MemoryContext {
            ledger: Arc::clone(self),
            tx_id: tx_id.into(),
            timestamp: Some(timestamp),
        }
    }

    /// Arm a fail point. It stays armed until [`clear_faults`](Self::clear_faults).
    pub fn fail(&self, point: FailPoint) -> Result<()> {
        let mut inner = self.write()?;
        match point {
            FailPoint::CursorRead(n) => inner.read_fault = Some(n),
            other => {
                inner.faults.insert(other);
            }
        }
        Ok(())
    }

    pub fn clear_faults(&self) -> Result<()> {
        let mut inner = self.write()?;
        inner.faults.clear();
        inner.read_fault = None;
        Ok(())
    }

    /// Number of cursors opened and not yet closed.
    pub fn open_cursors(&self) -> usize {
        self.cursors.open_cursors()
    }

    /// Number of stored entries.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.entries.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryLedgerInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryLedgerInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn check(inner: &MemoryLedgerInner, point: FailPoint) -> Result<()> {
        if inner.faults.contains(&point) {
            return Err(StoreError::Injected(format!("{:?}", point)));
        }
        Ok(())
    }

    fn open_cursor(&self, inner: &MemoryLedgerInner, records: Vec<QueryRecord>) -> SnapshotCursor {
        let cursor = SnapshotCursor::open(records, &self.cursors);
        match inner.read_fault {
            Some(n) => cursor.fail_at(n),
            None => cursor,
        }
    }
}

/// One transaction's view of a [`MemoryLedger`].
///
/// Writes go straight to the shared ledger, so they are visible to later
/// reads through this and every other context.
#[derive(Debug, Clone)]
pub struct MemoryContext {
    ledger: Arc<MemoryLedger>,
    tx_id: String,
    timestamp: Option<TxTimestamp>,
}

impl MemoryContext {
    /// Make `tx_timestamp` fail, as when the host cannot supply one.
    pub fn without_timestamp(mut self) -> Self {
        self.timestamp = None;
        self
    }

    pub fn ledger(&self) -> &Arc<MemoryLedger> {
        &self.ledger
    }
}

impl TransactionContext for MemoryContext {
    fn get_state(&self, key: &str) -> Result<Option<Bytes>> {
        let inner = self.ledger.read()?;
        MemoryLedger::check(&inner, FailPoint::GetState)?;
        Ok(inner.entries.get(key).cloned())
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut inner = self.ledger.write()?;
        MemoryLedger::check(&inner, FailPoint::PutState)?;
        inner
            .entries
            .insert(key.to_string(), Bytes::copy_from_slice(value));
        Ok(())
    }

    fn del_state(&self, key: &str) -> Result<()> {
        let mut inner = self.ledger.write()?;
        MemoryLedger::check(&inner, FailPoint::DelState)?;
        inner.entries.remove(key);
        Ok(())
    }

    fn get_query_result(&self, query: &str) -> Result<Box<dyn QueryCursor + '_>> {
        let query = RichQuery::parse(query)?;
        let inner = self.ledger.read()?;
        MemoryLedger::check(&inner, FailPoint::Query)?;

        let records = query
            .filter(inner.entries.iter())
            .into_iter()
            .map(|(k, v)| QueryRecord::new(k.clone(), v.clone()))
            .collect();

        Ok(Box::new(self.ledger.open_cursor(&inner, records)))
    }

    fn get_state_by_range(&self, start: &str, end: &str) -> Result<Box<dyn QueryCursor + '_>> {
        let inner = self.ledger.read()?;
        MemoryLedger::check(&inner, FailPoint::Query)?;

        let upper = if end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end.to_string())
        };
        let lower = Bound::Included(start.to_string());

        let records = if matches!(&upper, Bound::Excluded(e) if e.as_str() <= start) {
            Vec::new()
        } else {
            inner
                .entries
                .range::<String, _>((lower, upper))
                .map(|(k, v)| QueryRecord::new(k.clone(), v.clone()))
                .collect()
        };

        Ok(Box::new(self.ledger.open_cursor(&inner, records)))
    }

    fn tx_id(&self) -> &str {
        &self.tx_id
    }

    fn tx_timestamp(&self) -> Result<TxTimestamp> {
        self.timestamp
            .ok_or_else(|| StoreError::Unavailable("transaction timestamp".into()))
    }
}
