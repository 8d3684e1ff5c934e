//! # ledgerkit core
//!
//! Pure primitives for ledgerkit: input validation, canonical hashing,
//! required-field checks and the response envelope.
//!
//! This crate contains no I/O and no ledger access. It is pure computation
//! over caller-supplied values.
//!
//! ## Key Types
//!
//! - [`Error`] - The four failure kinds every operation reports
//! - [`LedgerKey`] - A validated, non-empty ledger key
//! - [`Sha256Hash`] - Content hash over the canonical encoding
//! - [`Validatable`] - Records that declare their required fields
//! - [`ResponseEnvelope`] / [`Payload`] - The uniform outward result
//!
//! ## Canonicalization
//!
//! Hashes are computed over deterministic CBOR. See [`canonical`] module.

pub mod canonical;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod required;
pub mod types;
pub mod validation;

pub use canonical::{deserialize, serialize, ENCODING_VERSION};
pub use crypto::{hash, Sha256Hash};
pub use envelope::{Payload, ResponseEnvelope};
pub use error::{Error, Result};
pub use required::{check_fields, check_required, AsFieldValue, FieldSpec, FieldValue, Validatable};
pub use types::{LedgerKey, TxTimestamp};
pub use validation::{check_key_valid, check_key_valid_named, string_to_bytes, DataInput};
