//! The uniform response envelope returned to the host.
//!
//! An envelope carries the transaction id and time alongside the payload,
//! a message, and an item count. The count is derived from the payload
//! variant, never supplied by the caller:
//!
//! - [`Payload::Absent`] counts 0 and is written as the placeholder `""`
//! - [`Payload::Sequence`] counts its elements
//! - [`Payload::Single`] counts 1

use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

/// The value carried by an envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload<T> {
    /// No value, or a reference/collection holding nothing.
    Absent,
    /// Exactly one item (scalar, string, or record).
    Single(T),
    /// An ordered sequence of items.
    Sequence(Vec<T>),
}

impl<T> Payload<T> {
    /// Wrap an optional single item; `None` becomes [`Payload::Absent`].
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Payload::Single(v),
            None => Payload::Absent,
        }
    }

    /// Number of items this payload represents.
    pub fn count(&self) -> usize {
        match self {
            Payload::Absent => 0,
            Payload::Single(_) => 1,
            Payload::Sequence(items) => items.len(),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Payload::Absent)
    }
}

impl<T> Default for Payload<T> {
    fn default() -> Self {
        Payload::Absent
    }
}

impl<T> From<Vec<T>> for Payload<T> {
    fn from(items: Vec<T>) -> Self {
        Payload::Sequence(items)
    }
}

/// A collection that may not exist; `None` becomes [`Payload::Absent`].
impl<T> From<Option<Vec<T>>> for Payload<T> {
    fn from(items: Option<Vec<T>>) -> Self {
        match items {
            Some(items) => Payload::Sequence(items),
            None => Payload::Absent,
        }
    }
}

impl<T: Serialize> Serialize for Payload<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Payload::Absent => serializer.serialize_str(""),
            Payload::Single(item) => item.serialize(serializer),
            Payload::Sequence(items) => items.serialize(serializer),
        }
    }
}

/// Outward-facing result of a ledger operation.
///
/// Fields are private: an envelope is built once by [`ResponseEnvelope::new`]
/// and never changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope<T> {
    count: usize,
    #[serde(rename = "txId")]
    tx_id: String,
    #[serde(rename = "txTime")]
    tx_time: i64,
    value: Payload<T>,
    #[serde(rename = "msg")]
    message: String,
}

impl<T> ResponseEnvelope<T> {
    /// Build an envelope, deriving the count from the payload.
    pub fn new(
        tx_id: impl Into<String>,
        tx_time: i64,
        message: impl Into<String>,
        value: Payload<T>,
    ) -> Self {
        Self {
            count: value.count(),
            tx_id: tx_id.into(),
            tx_time,
            value,
            message: message.into(),
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    /// Transaction time in unix seconds.
    pub fn tx_time(&self) -> i64 {
        self.tx_time
    }

    pub fn value(&self) -> &Payload<T> {
        &self.value
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn into_value(self) -> Payload<T> {
        self.value
    }
}

impl<T: Serialize> ResponseEnvelope<T> {
    /// Wire form handed to the host dispatcher.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::serialization(e.to_string()))
    }
}
