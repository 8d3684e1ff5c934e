//! Required-field checks for structured records.
//!
//! A record describes its own schema through [`Validatable`]: an ordered list
//! of fields, each with a name, a required flag and a view of its current
//! value. [`check_required`] walks that list once, in declaration order, and
//! reports the first required field that is empty.
//!
//! Emptiness depends on the field kind:
//!
//! | Kind | Missing when |
//! |------|--------------|
//! | text | zero length |
//! | integer | `0` |
//! | float | `0.0` |
//! | reference | `None` |
//! | collection | never; an empty but present collection counts |
//!
//! Most records use the [`required_fields!`](crate::required_fields) macro
//! instead of implementing the trait by hand.

use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};

/// Current value of a field, classified by kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Integer(i128),
    Float(f64),
    /// Reference or collection; `false` when nothing is held.
    Reference(bool),
}

impl FieldValue<'_> {
    /// Whether the value counts as absent for a required field.
    pub fn is_missing(&self) -> bool {
        match *self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Integer(n) => n == 0,
            FieldValue::Float(f) => f == 0.0,
            FieldValue::Reference(present) => !present,
        }
    }
}

/// One declared field of a record schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec<'a> {
    pub name: &'static str,
    pub required: bool,
    pub value: FieldValue<'a>,
}

impl<'a> FieldSpec<'a> {
    pub fn required(name: &'static str, value: FieldValue<'a>) -> Self {
        Self { name, required: true, value }
    }

    pub fn optional(name: &'static str, value: FieldValue<'a>) -> Self {
        Self { name, required: false, value }
    }
}

/// A record whose fields can be inspected for required-field checks.
pub trait Validatable {
    /// Declared fields in declaration order.
    fn fields(&self) -> Vec<FieldSpec<'_>>;

    /// Check that every required field holds a value.
    fn check_required(&self) -> Result<()> {
        check_fields(&self.fields())
    }
}

/// Check a record's required fields, reporting the first missing one.
pub fn check_required<T: Validatable + ?Sized>(record: &T) -> Result<()> {
    record.check_required()
}

/// Check an explicit field list, reporting the first missing required field.
pub fn check_fields(fields: &[FieldSpec<'_>]) -> Result<()> {
    match fields.iter().find(|f| f.required && f.value.is_missing()) {
        Some(field) => Err(Error::validation(format!("字段{}为必须，请检查", field.name))),
        None => Ok(()),
    }
}

/// Conversion from a field's Rust type to its [`FieldValue`] view.
pub trait AsFieldValue {
    fn as_field_value(&self) -> FieldValue<'_>;
}

impl AsFieldValue for String {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Text(self)
    }
}

impl AsFieldValue for str {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Text(self)
    }
}

impl AsFieldValue for &str {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Text(self)
    }
}

macro_rules! integer_field {
    ($($t:ty),*) => {
        $(
            impl AsFieldValue for $t {
                fn as_field_value(&self) -> FieldValue<'_> {
                    FieldValue::Integer(*self as i128)
                }
            }
        )*
    };
}

integer_field!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl AsFieldValue for f32 {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Float(f64::from(*self))
    }
}

impl AsFieldValue for f64 {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Float(*self)
    }
}

impl<T> AsFieldValue for Option<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Reference(self.is_some())
    }
}

impl<T> AsFieldValue for Vec<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Reference(true)
    }
}

impl<K, V, S> AsFieldValue for HashMap<K, V, S> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Reference(true)
    }
}

impl<K, V> AsFieldValue for BTreeMap<K, V> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Reference(true)
    }
}

impl<T: AsFieldValue + ?Sized> AsFieldValue for Box<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        (**self).as_field_value()
    }
}

/// Implement [`Validatable`] for a struct from a field list.
///
/// Fields are listed in declaration order; `#[required]` marks the ones that
/// must hold a value.
///
/// ```
/// use ledgerkit_core::{check_required, required_fields};
///
/// struct Asset {
///     id: String,
///     note: String,
///     value: i64,
/// }
///
/// required_fields!(Asset {
///     #[required] id,
///     note,
///     #[required] value,
/// });
///
/// let asset = Asset { id: "a1".into(), note: String::new(), value: 0 };
/// let err = check_required(&asset).unwrap_err();
/// assert_eq!(err.to_string(), "字段value为必须，请检查");
/// ```
#[macro_export]
macro_rules! required_fields {
    ($ty:ty { $( $(#[$flag:ident])? $field:ident ),* $(,)? }) => {
        impl $crate::required::Validatable for $ty {
            fn fields(&self) -> ::std::vec::Vec<$crate::required::FieldSpec<'_>> {
                ::std::vec![
                    $(
                        $crate::required::FieldSpec {
                            name: ::std::stringify!($field),
                            required: $crate::__required_flag!($($flag)?),
                            value: $crate::required::AsFieldValue::as_field_value(&self.$field),
                        }
                    ),*
                ]
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __required_flag {
    () => {
        false
    };
    (required) => {
        true
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::required_fields;

    #[derive(Default)]
    struct Patient {
        name: String,
        age: u32,
        weight: f64,
        notes: String,
        doctor: Option<String>,
        visits: Vec<String>,
    }

    required_fields!(Patient {
        #[required] name,
        #[required] age,
        #[required] weight,
        notes,
        #[required] doctor,
        #[required] visits,
    });

    fn complete() -> Patient {
        Patient {
            name: "Li Lei".into(),
            age: 42,
            weight: 70.5,
            notes: String::new(),
            doctor: Some("Dr. Han".into()),
            visits: vec!["2024-01-02".into()],
        }
    }

    #[test]
    fn test_complete_record_passes() {
        assert!(check_required(&complete()).is_ok());
    }

    #[test]
    fn test_optional_field_may_be_empty() {
        let p = complete();
        assert!(p.notes.is_empty());
        assert!(p.check_required().is_ok());
    }

    #[test]
    fn test_first_missing_field_wins() {
        let p = Patient { age: 0, doctor: None, ..complete() };
        let err = check_required(&p).unwrap_err();
        assert_eq!(err, Error::Validation("字段age为必须，请检查".into()));
    }

    #[test]
    fn test_all_missing_reports_first_declared() {
        let err = check_required(&Patient::default()).unwrap_err();
        assert_eq!(err.message(), "字段name为必须，请检查");
    }

    #[test]
    fn test_kind_specific_emptiness() {
        let p = Patient { weight: 0.0, ..complete() };
        assert_eq!(check_required(&p).unwrap_err().message(), "字段weight为必须，请检查");

        let p = Patient { doctor: None, ..complete() };
        assert_eq!(check_required(&p).unwrap_err().message(), "字段doctor为必须，请检查");

        // an empty collection is present; only `None` is missing
        let p = Patient { visits: Vec::new(), ..complete() };
        assert!(check_required(&p).is_ok());
    }

    #[test]
    fn test_empty_collections_are_present() {
        let mut map = HashMap::new();
        map.insert("k", 1);
        assert_eq!(Vec::<u8>::new().as_field_value(), FieldValue::Reference(true));
        assert_eq!(HashMap::<u8, u8>::new().as_field_value(), FieldValue::Reference(true));
        assert_eq!(BTreeMap::<u8, u8>::new().as_field_value(), FieldValue::Reference(true));
        assert_eq!(map.as_field_value(), FieldValue::Reference(true));
        assert_eq!(None::<Vec<u8>>.as_field_value(), FieldValue::Reference(false));
    }

    #[test]
    fn test_hand_written_schema() {
        let fields = [
            FieldSpec::optional("memo", FieldValue::Text("")),
            FieldSpec::required("amount", FieldValue::Float(0.0)),
            FieldSpec::required("owner", FieldValue::Text("")),
        ];
        assert_eq!(check_fields(&fields).unwrap_err().message(), "字段amount为必须，请检查");
    }

    #[test]
    fn test_negative_numbers_are_present() {
        assert!(!FieldValue::Integer(-1).is_missing());
        assert!(!FieldValue::Float(-0.5).is_missing());
        assert!(FieldValue::Float(-0.0).is_missing());
    }
}
