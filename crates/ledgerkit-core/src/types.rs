//! Strong type definitions for ledgerkit.
//!
//! Keys are newtypes so an unvalidated string cannot reach the ledger by
//! accident.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::validation::check_key_valid;

/// A non-empty key identifying a ledger entry.
///
/// Construction runs the same check as [`check_key_valid`], so an existing
/// `LedgerKey` is never empty or whitespace-only.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LedgerKey(String);

impl LedgerKey {
    /// Validate and wrap a key.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        check_key_valid(&key)?;
        Ok(Self(key))
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap into the owned string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for LedgerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LedgerKey({:?})", self.0)
    }
}

impl fmt::Display for LedgerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LedgerKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LedgerKey {
    type Error = crate::error::Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for LedgerKey {
    type Error = crate::error::Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<LedgerKey> for String {
    fn from(key: LedgerKey) -> Self {
        key.0
    }
}

/// Transaction timestamp as reported by the transaction context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TxTimestamp {
    /// Unix seconds.
    pub seconds: i64,
    /// Sub-second nanoseconds.
    pub nanos: i32,
}

impl TxTimestamp {
    pub const fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    /// Whole unix seconds; the sub-second part is truncated.
    pub const fn unix_seconds(&self) -> i64 {
        self.seconds
    }
}
