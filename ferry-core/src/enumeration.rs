use crate::{MappingError, Result, Value, coerce};
use std::any;

/// One declared member of an enumeration: its name and its ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumMember {
    pub name: &'static str,
    pub ordinal: i64,
}

impl EnumMember {
    /// Case insensitive lookup by member name.
    pub fn find_by_name(members: &'static [EnumMember], name: &str) -> Option<&'static Self> {
        let name = name.trim();
        members.iter().find(|m| m.name.eq_ignore_ascii_case(name))
    }

    pub fn find_by_ordinal(members: &'static [EnumMember], ordinal: i64) -> Option<&'static Self> {
        members.iter().find(|m| m.ordinal == ordinal)
    }
}

/// Rust enum stored as an integral ordinal.
///
/// Usually implemented through `#[derive(Enumeration)]`, which also provides
/// the matching [`crate::AsValue`] implementation.
///
/// `NULL` maps to ordinal 0. An enum without a variant for 0 cannot hold it:
/// give it a `#[ferry(other)]` variant, which receives `NULL` as `Other(0)`,
/// or map it through `Option<E>`. Otherwise the conversion fails with
/// [`MappingError::InvalidEnumValue`].
pub trait Enumeration: Sized {
    const MEMBERS: &'static [EnumMember];

    fn ordinal(&self) -> i64;

    /// The variant of `ordinal`, `None` when the enum has no variant for it.
    fn from_ordinal(ordinal: i64) -> Option<Self>;
}

/// Converts a value to the enumeration `E` through the coercion rules.
///
/// Names are matched case insensitively, anything else becomes an ordinal.
/// `NULL` is ordinal 0, see [`Enumeration`].
pub fn enum_from_value<E: Enumeration>(value: Value) -> Result<E> {
    let ordinal = match value {
        Value::Enum(Some(v), ..) => v,
        value => match coerce(value, &Value::Enum(None, E::MEMBERS), false)? {
            Value::Enum(Some(v), ..) => v,
            other => {
                return Err(MappingError::UnconvertibleValue {
                    value: format!("{other:?}"),
                    target: any::type_name::<E>().into(),
                }
                .into());
            }
        },
    };
    E::from_ordinal(ordinal).ok_or_else(|| {
        MappingError::InvalidEnumValue {
            enumeration: any::type_name::<E>().into(),
            value: ordinal.to_string(),
        }
        .into()
    })
}
