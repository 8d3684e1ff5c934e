//! Keyed reads, writes and deletes against the transaction context.
//!
//! Every operation validates its key before touching the ledger. Validation
//! failures are returned unchanged; ledger failures become
//! [`Error::Access`] with a prefix naming the operation.
//!
//! Keys are taken as `impl AsRef<str>`, so plain strings and
//! [`LedgerKey`](ledgerkit_core::LedgerKey) both work.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use ledgerkit_core::{check_key_valid, check_required, Error, Result, Validatable};
use ledgerkit_store::TransactionContext;

pub use ledgerkit_core::{string_to_bytes, DataInput};

/// Read the raw value stored under `key`.
///
/// A missing key is `Ok(None)`, not an error.
pub fn get_data<C>(ctx: &C, key: impl AsRef<str>) -> Result<Option<Bytes>>
where
    C: TransactionContext + ?Sized,
{
    let key = key.as_ref();
    check_key_valid(key)?;
    ctx.get_state(key)
        .map_err(|e| Error::access(format!("Failed query Profile.{}", e)))
}

/// Serialize `value` to JSON and store it under `key`.
pub fn save_data<C, T>(ctx: &C, key: impl AsRef<str>, value: &T) -> Result<()>
where
    C: TransactionContext + ?Sized,
    T: Serialize + ?Sized,
{
    let key = key.as_ref();
    check_key_valid(key)?;
    let bytes = serde_json::to_vec(value)
        .map_err(|e| Error::serialization(format!("Failed Marshal Profile.{}", e)))?;
    ctx.put_state(key, &bytes)
        .map_err(|e| Error::access(format!("Failed to save Profile.{}", e)))?;
    tracing::debug!(key, len = bytes.len(), "saved ledger entry");
    Ok(())
}

/// Delete the entry under `key`. Deleting a missing key succeeds.
pub fn del_data<C>(ctx: &C, key: impl AsRef<str>) -> Result<()>
where
    C: TransactionContext + ?Sized,
{
    let key = key.as_ref();
    check_key_valid(key)?;
    ctx.del_state(key)
        .map_err(|e| Error::access(format!("Failed to delete Profile.{}", e)))?;
    tracing::debug!(key, "deleted ledger entry");
    Ok(())
}

/// Read and decode a JSON record stored under `key`.
pub fn get_record<C, T>(ctx: &C, key: impl AsRef<str>) -> Result<Option<T>>
where
    C: TransactionContext + ?Sized,
    T: DeserializeOwned,
{
    match get_data(ctx, key)? {
        Some(raw) => serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|e| Error::serialization(format!("Failed Unmarshal Profile.{}", e))),
        None => Ok(None),
    }
}

/// Check a record's required fields, then store it as JSON.
pub fn save_record<C, T>(ctx: &C, key: impl AsRef<str>, record: &T) -> Result<()>
where
    C: TransactionContext + ?Sized,
    T: Serialize + Validatable,
{
    check_required(record)?;
    save_data(ctx, key, record)
}
