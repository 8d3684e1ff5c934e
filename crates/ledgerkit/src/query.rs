//! Query iteration with a per-record transform.
//!
//! The cursor returned by the ledger is wrapped in a [`CursorGuard`] as soon
//! as it is obtained. The guard closes it when dropped, so the cursor is
//! released on every exit path: normal completion, a failing transform, a
//! failing read, or a panic inside the transform.
//!
//! Results keep cursor order. The first failure aborts the iteration and no
//! partial results are returned. A query that matches nothing yields
//! `Ok(None)`.

use ledgerkit_core::{Error, Result};
use ledgerkit_store::{QueryCursor, QueryRecord, TransactionContext};

/// Closes the wrapped cursor when dropped.
pub struct CursorGuard<'a> {
    cursor: Box<dyn QueryCursor + 'a>,
}

impl<'a> CursorGuard<'a> {
    pub fn new(cursor: Box<dyn QueryCursor + 'a>) -> Self {
        Self { cursor }
    }

    /// Next record, with read failures mapped to access errors.
    fn next_record(&mut self) -> Option<Result<QueryRecord>> {
        self.cursor
            .next()
            .map(|r| r.map_err(|e| Error::access(format!("qres.Next err.{}", e))))
    }
}

impl Drop for CursorGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.cursor.close() {
            tracing::warn!(error = %e, "failed to close query cursor");
        }
    }
}

/// Run a rich query and transform every matching record.
///
/// `transform` receives the raw value and the key of each record, in cursor
/// order.
pub fn query_list<C, T, F>(ctx: &C, query: &str, transform: F) -> Result<Option<Vec<T>>>
where
    C: TransactionContext + ?Sized,
    F: FnMut(&[u8], &str) -> Result<T>,
{
    let cursor = ctx
        .get_query_result(query)
        .map_err(|e| Error::access(format!("查询出错：{}", e)))?;
    collect(CursorGuard::new(cursor), transform)
}

/// Transform every record with a key in `[start, end)`.
///
/// An empty `end` leaves the range open above.
pub fn query_range<C, T, F>(ctx: &C, start: &str, end: &str, transform: F) -> Result<Option<Vec<T>>>
where
    C: TransactionContext + ?Sized,
    F: FnMut(&[u8], &str) -> Result<T>,
{
    let cursor = ctx
        .get_state_by_range(start, end)
        .map_err(|e| Error::access(format!("查询出错：{}", e)))?;
    collect(CursorGuard::new(cursor), transform)
}

fn collect<T, F>(mut guard: CursorGuard<'_>, mut transform: F) -> Result<Option<Vec<T>>>
where
    F: FnMut(&[u8], &str) -> Result<T>,
{
    let mut out = Vec::new();
    while let Some(record) = guard.next_record() {
        let record = record?;
        out.push(transform(&record.value, &record.key)?);
    }
    tracing::debug!(records = out.len(), "query drained");

    if out.is_empty() {
        Ok(None)
    } else {
        Ok(Some(out))
    }
}
