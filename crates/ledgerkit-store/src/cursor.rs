//! Snapshot cursor shared by the bundled ledgers.
//!
//! Both backends materialise the matching records when the query runs and
//! hand them out one at a time. Each open cursor is counted on a
//! [`CursorTracker`] so tests can verify that nothing leaks.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::{Result, StoreError};
use crate::traits::{QueryCursor, QueryRecord};

/// Counts cursors that have been opened but not closed.
#[derive(Debug, Clone, Default)]
pub struct CursorTracker {
    open: Arc<AtomicUsize>,
}

impl CursorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cursors currently open.
    pub fn open_cursors(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    fn acquire(&self) {
        self.open.fetch_add(1, Ordering::SeqCst);
    }

    fn release(&self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A cursor over records captured when the query ran.
#[derive(Debug)]
pub struct SnapshotCursor {
    records: VecDeque<QueryRecord>,
    position: usize,
    fail_at: Option<usize>,
    tracker: CursorTracker,
    closed: bool,
}

impl SnapshotCursor {
    /// Open a cursor and register it with `tracker`.
    pub fn open(records: Vec<QueryRecord>, tracker: &CursorTracker) -> Self {
        tracker.acquire();
        Self {
            records: records.into(),
            position: 0,
            fail_at: None,
            tracker: tracker.clone(),
            closed: false,
        }
    }

    /// Make the read at zero-based `position` fail.
    pub fn fail_at(mut self, position: usize) -> Self {
        self.fail_at = Some(position);
        self
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Records not yet read.
    pub fn remaining(&self) -> usize {
        self.records.len()
    }
}

impl Iterator for SnapshotCursor {
    type Item = Result<QueryRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return Some(Err(StoreError::CursorClosed));
        }
        if self.fail_at == Some(self.position) {
            self.fail_at = None;
            return Some(Err(StoreError::Injected(format!(
                "cursor read #{}",
                self.position
            ))));
        }
        let record = self.records.pop_front()?;
        self.position += 1;
        tracing::trace!(key = %record.key, position = self.position, "cursor record");
        Some(Ok(record))
    }
}

impl QueryCursor for SnapshotCursor {
    fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.closed = true;
            self.records.clear();
            self.tracker.release();
        }
        Ok(())
    }
}

impl Drop for SnapshotCursor {
    fn drop(&mut self) {
        if !self.closed {
            tracing::warn!(position = self.position, "query cursor dropped without close");
        }
    }
}
