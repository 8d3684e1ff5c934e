//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur inside a ledger backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The rich query could not be parsed.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The transaction context cannot supply a value (e.g. its timestamp).
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// A cursor was read after it was closed.
    #[error("cursor already closed")]
    CursorClosed,

    /// A lock guarding backend state was poisoned.
    #[error("lock poisoned: {0}")]
    Poisoned(String),

    /// Failure injected through a fail point.
    #[error("injected failure at {0}")]
    Injected(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),
}

impl From<StoreError> for ledgerkit_core::Error {
    fn from(e: StoreError) -> Self {
        ledgerkit_core::Error::access(e.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
