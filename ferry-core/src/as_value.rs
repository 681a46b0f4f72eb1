use crate::{MappingError, Result, Value, coerce};
use rust_decimal::Decimal;
use std::any;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Conversion between a native Rust type and the dynamically typed [`Value`].
///
/// This is the typed front of the coercion engine: [`AsValue::try_from_value`]
/// accepts the canonical variant directly and sends everything else through
/// [`coerce`], so a `Value::Varchar(Some("42"))` read from a text column still
/// lands in an `i32` field.
///
/// # Examples
/// ```rust
/// use ferry_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert!(matches!(v, Value::Int32(Some(42))));
/// let n: i64 = AsValue::try_from_value(v).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    /// Whether `NULL` maps to a value of this type (`Option<T>`) or to its
    /// zero value.
    const NULLABLE: bool = false;
    /// Type descriptor: the variant of this type without payload.
    fn as_empty_value() -> Value;
    /// Convert this value into its owned [`Value`] representation.
    fn as_value(self) -> Value;
    /// Attempt to convert a dynamic [`Value`] into `Self`.
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

impl From<&'static str> for Value {
    fn from(value: &'static str) -> Self {
        Value::Varchar(Some(value.into()))
    }
}

/// Converts `value` into `T` following the coercion rules.
///
/// `NULL` becomes `None` for `Option<T>` and the zero value otherwise.
pub fn change_type<T: AsValue>(value: impl Into<Value>) -> Result<T> {
    T::try_from_value(value.into())
}

pub(crate) fn unconvertible<T>(value: &Value) -> crate::Error {
    MappingError::UnconvertibleValue {
        value: format!("{value:?}"),
        target: any::type_name::<T>().into(),
    }
    .into()
}

macro_rules! impl_as_value {
    ($source:ty, $destination:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self.into()))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                if let $destination(Some(v)) = value {
                    return Ok(v.into());
                }
                match coerce(value, &Self::as_empty_value(), false)? {
                    $destination(Some(v)) => Ok(v.into()),
                    other => Err(unconvertible::<Self>(&other)),
                }
            }
        }
    };
}
impl_as_value!(bool, Value::Boolean);
impl_as_value!(i8, Value::Int8);
impl_as_value!(i16, Value::Int16);
impl_as_value!(i32, Value::Int32);
impl_as_value!(i64, Value::Int64);
impl_as_value!(u8, Value::UInt8);
impl_as_value!(u16, Value::UInt16);
impl_as_value!(u32, Value::UInt32);
impl_as_value!(u64, Value::UInt64);
impl_as_value!(f32, Value::Float32);
impl_as_value!(f64, Value::Float64);
impl_as_value!(Decimal, Value::Decimal);
impl_as_value!(char, Value::Char);
impl_as_value!(String, Value::Varchar);
impl_as_value!(Box<[u8]>, Value::Blob);
impl_as_value!(Vec<u8>, Value::Blob);
impl_as_value!(Date, Value::Date);
impl_as_value!(Time, Value::Time);
impl_as_value!(PrimitiveDateTime, Value::Timestamp);
impl_as_value!(OffsetDateTime, Value::TimestampWithTimezone);
impl_as_value!(Uuid, Value::Uuid);

impl<T: AsValue> AsValue for Option<T> {
    const NULLABLE: bool = true;
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(None);
        }
        T::try_from_value(value).map(Some)
    }
}
