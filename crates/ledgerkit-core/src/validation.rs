//! Input validation performed before any ledger access.

use crate::error::{Error, Result};

/// Display name used when the caller does not supply one.
pub const DEFAULT_KEY_NAME: &str = "key";

/// Check that a key is usable, naming it `key` in the error message.
pub fn check_key_valid(key: &str) -> Result<()> {
    check_key_valid_named(key, DEFAULT_KEY_NAME)
}

/// Check that a key is usable, naming it `display_name` in the error message.
///
/// Empty and whitespace-only keys are rejected.
pub fn check_key_valid_named(key: &str, display_name: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(Error::validation(format!("{} 不能为空!", display_name)));
    }
    Ok(())
}

/// Raw input accepted by [`string_to_bytes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataInput<'a> {
    /// Textual input, converted as UTF-8.
    Text(&'a str),
    /// Already-binary input, passed through.
    Binary(&'a [u8]),
    /// Any other input kind, identified by its type name.
    Other(&'a str),
}

impl<'a> From<&'a str> for DataInput<'a> {
    fn from(s: &'a str) -> Self {
        DataInput::Text(s)
    }
}

impl<'a> From<&'a String> for DataInput<'a> {
    fn from(s: &'a String) -> Self {
        DataInput::Text(s)
    }
}

impl<'a> From<&'a [u8]> for DataInput<'a> {
    fn from(b: &'a [u8]) -> Self {
        DataInput::Binary(b)
    }
}

impl<'a> From<&'a Vec<u8>> for DataInput<'a> {
    fn from(b: &'a Vec<u8>) -> Self {
        DataInput::Binary(b)
    }
}

/// Normalize text or binary input to bytes.
///
/// Fails with [`Error::Type`] for any other input kind and with
/// [`Error::Validation`] when the result is empty.
pub fn string_to_bytes<'a>(input: impl Into<DataInput<'a>>) -> Result<Vec<u8>> {
    let bytes = match input.into() {
        DataInput::Text(s) => s.as_bytes().to_vec(),
        DataInput::Binary(b) => b.to_vec(),
        DataInput::Other(kind) => {
            return Err(Error::type_mismatch(format!(
                "dataStr类型错误（{}），必须为string或[]byte",
                kind
            )));
        }
    };
    if bytes.is_empty() {
        return Err(Error::validation("dataStr不能为空"));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_key_rejected() {
        let err = check_key_valid("").unwrap_err();
        assert_eq!(err, Error::Validation("key 不能为空!".into()));
    }

    #[test]
    fn test_display_name_in_message() {
        let err = check_key_valid_named("", "assetId").unwrap_err();
        assert_eq!(err.message(), "assetId 不能为空!");
    }

    #[test]
    fn test_whitespace_key_rejected() {
        assert!(matches!(check_key_valid(" \n "), Err(Error::Validation(_))));
    }

    #[test]
    fn test_string_to_bytes_text() {
        assert_eq!(string_to_bytes("abc").unwrap(), b"abc".to_vec());
    }

    #[test]
    fn test_string_to_bytes_binary_passthrough() {
        let raw = vec![0u8, 1, 2, 255];
        assert_eq!(string_to_bytes(&raw).unwrap(), raw);
    }

    #[test]
    fn test_string_to_bytes_other_kind() {
        let err = string_to_bytes(DataInput::Other("int")).unwrap_err();
        assert_eq!(
            err,
            Error::Type("dataStr类型错误（int），必须为string或[]byte".into())
        );
    }

    #[test]
    fn test_string_to_bytes_empty() {
        assert_eq!(
            string_to_bytes("").unwrap_err(),
            Error::Validation("dataStr不能为空".into())
        );
        let empty: &[u8] = &[];
        assert!(matches!(string_to_bytes(empty), Err(Error::Validation(_))));
    }

    proptest! {
        #[test]
        fn non_blank_keys_pass(key in "[a-zA-Z0-9:_-]{1,64}") {
            prop_assert!(check_key_valid(&key).is_ok());
        }
    }
}
