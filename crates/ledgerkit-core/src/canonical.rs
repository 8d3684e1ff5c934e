//! Canonical CBOR encoding for deterministic serialization.
//!
//! Any `serde::Serialize` value is first lowered to a `ciborium` value tree
//! and then written with RFC 8949 Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - Floats are always written as 8-byte IEEE-754, NaN as `0x7ff8000000000000`
//!
//! The encoded value is wrapped in a versioned frame `[ENCODING_VERSION, value]`.
//!
//! **CRITICAL**: hashes are computed over this encoding. Any change to it
//! must bump [`ENCODING_VERSION`].

use ciborium::value::{Integer, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// Version tag written as the first element of every frame.
pub const ENCODING_VERSION: u64 = 1;

/// Encode a value into its canonical, versioned byte form.
pub fn serialize<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let inner = Value::serialized(value)
        .map_err(|e| Error::serialization(format!("获取二进制数据错误：{}", e)))?;
    let frame = Value::Array(vec![Value::Integer(ENCODING_VERSION.into()), inner]);
    encode_canonical(&frame)
}

/// Decode a frame produced by [`serialize`].
pub fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let frame: Value = ciborium::from_reader(bytes)
        .map_err(|e| Error::serialization(format!("decoding error: {}", e)))?;

    let mut items = match frame {
        Value::Array(items) if items.len() == 2 => items,
        _ => return Err(Error::serialization("malformed frame: expected [version, value]")),
    };

    let inner = items.pop().unwrap_or(Value::Null);
    match items.pop() {
        Some(Value::Integer(v)) if i128::from(v) == ENCODING_VERSION as i128 => {}
        Some(other) => {
            return Err(Error::serialization(format!(
                "unsupported encoding version: {:?}",
                other
            )));
        }
        None => return Err(Error::serialization("malformed frame: missing version")),
    }

    inner
        .deserialized()
        .map_err(|e| Error::serialization(format!("decoding error: {}", e)))
}

/// Encode a CBOR value tree to canonical bytes.
pub fn encode_canonical(value: &Value) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_value_to(&mut buf, value)?;
    Ok(buf)
}

/// Recursively encode a CBOR value.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) -> Result<()> {
    match value {
        Value::Integer(i) => encode_integer(buf, *i),
        Value::Bytes(b) => encode_bytes(buf, b),
        Value::Text(s) => encode_text(buf, s),
        Value::Array(arr) => return encode_array(buf, arr),
        Value::Map(entries) => return encode_map_canonical(buf, entries),
        Value::Tag(tag, inner) => {
            encode_uint(buf, 6, *tag);
            return encode_value_to(buf, inner);
        }
        Value::Float(f) => encode_float(buf, *f),
        Value::Bool(b) => buf.push(if *b { 0xf5 } else { 0xf4 }),
        Value::Null => buf.push(0xf6),
        _ => return Err(Error::serialization("unsupported CBOR value type")),
    }
    Ok(())
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: Integer) {
    let n: i128 = i.into();

    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        encode_uint(buf, 1, (-1 - n) as u64);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffffffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a float as an 8-byte IEEE-754 double (major type 7).
fn encode_float(buf: &mut Vec<u8>, f: f64) {
    let bits = if f.is_nan() { 0x7ff8_0000_0000_0000 } else { f.to_bits() };
    buf.push(0xfb);
    buf.extend_from_slice(&bits.to_be_bytes());
}

/// Encode a byte string (major type 2).
fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Encode a text string (major type 3).
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

/// Encode an array (major type 4).
fn encode_array(buf: &mut Vec<u8>, arr: &[Value]) -> Result<()> {
    encode_uint(buf, 4, arr.len() as u64);
    for item in arr {
        encode_value_to(buf, item)?;
    }
    Ok(())
}

/// Encode a map canonically (major type 5).
///
/// Keys are sorted by their encoded byte comparison.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) -> Result<()> {
    let mut key_value_pairs = Vec::with_capacity(entries.len());
    for (k, v) in entries {
        let mut key_buf = Vec::new();
        encode_value_to(&mut key_buf, k)?;
        key_value_pairs.push((key_buf, v));
    }

    key_value_pairs.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, key_value_pairs.len() as u64);
    for (key_bytes, value) in key_value_pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value)?;
    }
    Ok(())
}
