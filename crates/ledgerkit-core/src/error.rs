//! Error types for ledgerkit.
//!
//! Every failure the layer can report falls into one of four kinds. The
//! message is human-readable and is surfaced to callers unchanged.

use thiserror::Error;

/// Errors produced by ledgerkit operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Bad or missing input (empty key, missing required field).
    #[error("{0}")]
    Validation(String),

    /// Encoding or decoding failure.
    #[error("{0}")]
    Serialization(String),

    /// Input of an unexpected kind.
    #[error("{0}")]
    Type(String),

    /// Underlying ledger or transaction context failure.
    #[error("{0}")]
    Access(String),
}

impl Error {
    /// Build a validation error and log it.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into()).logged()
    }

    /// Build a serialization error and log it.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into()).logged()
    }

    /// Build a type error and log it.
    pub fn type_mismatch(msg: impl Into<String>) -> Self {
        Self::Type(msg.into()).logged()
    }

    /// Build an access error and log it.
    pub fn access(msg: impl Into<String>) -> Self {
        Self::Access(msg.into()).logged()
    }

    /// Short name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation",
            Error::Serialization(_) => "serialization",
            Error::Type(_) => "type",
            Error::Access(_) => "access",
        }
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        match self {
            Error::Validation(m) | Error::Serialization(m) | Error::Type(m) | Error::Access(m) => m,
        }
    }

    fn logged(self) -> Self {
        tracing::warn!(kind = self.kind(), "错误：{}", self.message());
        self
    }
}

/// Result type for ledgerkit operations.
pub type Result<T> = std::result::Result<T, Error>;
