use crate::EnumMember;
use rust_decimal::Decimal;
use std::fmt::{self, Debug};
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};
use uuid::Uuid;

/// Dynamically typed database value.
///
/// Every variant except `Null` carries an `Option` payload: the variant itself
/// doubles as a type descriptor (`Value::Int32(None)` describes an `i32`
/// column) while `None` is the typed "no value" of that column.
#[derive(Default, Clone)]
pub enum Value {
    /// Untyped null, what a data source returns for `NULL` and what
    /// parameters carry when they have no value.
    #[default]
    Null,
    Boolean(Option<bool>),
    Int8(Option<i8>),
    Int16(Option<i16>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    UInt8(Option<u8>),
    UInt16(Option<u16>),
    UInt32(Option<u32>),
    UInt64(Option<u64>),
    Float32(Option<f32>),
    Float64(Option<f64>),
    Decimal(Option<Decimal>),
    Char(Option<char>),
    Varchar(Option<String>),
    Blob(Option<Box<[u8]>>),
    Date(Option<Date>),
    Time(Option<Time>),
    Timestamp(Option<PrimitiveDateTime>),
    TimestampWithTimezone(Option<OffsetDateTime>),
    Uuid(Option<Uuid>),
    /// Enumeration ordinal together with the members table of its type.
    Enum(Option<i64>, &'static [EnumMember]),
}

impl Value {
    /// True for `Null` and for every typed variant without a payload.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Boolean(v) => v.is_none(),
            Value::Int8(v) => v.is_none(),
            Value::Int16(v) => v.is_none(),
            Value::Int32(v) => v.is_none(),
            Value::Int64(v) => v.is_none(),
            Value::UInt8(v) => v.is_none(),
            Value::UInt16(v) => v.is_none(),
            Value::UInt32(v) => v.is_none(),
            Value::UInt64(v) => v.is_none(),
            Value::Float32(v) => v.is_none(),
            Value::Float64(v) => v.is_none(),
            Value::Decimal(v) => v.is_none(),
            Value::Char(v) => v.is_none(),
            Value::Varchar(v) => v.is_none(),
            Value::Blob(v) => v.is_none(),
            Value::Date(v) => v.is_none(),
            Value::Time(v) => v.is_none(),
            Value::Timestamp(v) => v.is_none(),
            Value::TimestampWithTimezone(v) => v.is_none(),
            Value::Uuid(v) => v.is_none(),
            Value::Enum(v, ..) => v.is_none(),
        }
    }

    pub fn same_type(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Enum(.., l), Self::Enum(.., r)) => std::ptr::eq(*l, *r) || l == r,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }

    /// The typed "no value" of the same variant.
    pub fn as_null(&self) -> Value {
        match self {
            Value::Null => Value::Null,
            Value::Boolean(..) => Value::Boolean(None),
            Value::Int8(..) => Value::Int8(None),
            Value::Int16(..) => Value::Int16(None),
            Value::Int32(..) => Value::Int32(None),
            Value::Int64(..) => Value::Int64(None),
            Value::UInt8(..) => Value::UInt8(None),
            Value::UInt16(..) => Value::UInt16(None),
            Value::UInt32(..) => Value::UInt32(None),
            Value::UInt64(..) => Value::UInt64(None),
            Value::Float32(..) => Value::Float32(None),
            Value::Float64(..) => Value::Float64(None),
            Value::Decimal(..) => Value::Decimal(None),
            Value::Char(..) => Value::Char(None),
            Value::Varchar(..) => Value::Varchar(None),
            Value::Blob(..) => Value::Blob(None),
            Value::Date(..) => Value::Date(None),
            Value::Time(..) => Value::Time(None),
            Value::Timestamp(..) => Value::Timestamp(None),
            Value::TimestampWithTimezone(..) => Value::TimestampWithTimezone(None),
            Value::Uuid(..) => Value::Uuid(None),
            Value::Enum(.., members) => Value::Enum(None, members),
        }
    }

    /// The zero value of the same variant: what a non nullable column holds
    /// when the data source returns `NULL`.
    pub fn as_zero(&self) -> Value {
        match self {
            Value::Null => Value::Null,
            Value::Boolean(..) => Value::Boolean(Some(false)),
            Value::Int8(..) => Value::Int8(Some(0)),
            Value::Int16(..) => Value::Int16(Some(0)),
            Value::Int32(..) => Value::Int32(Some(0)),
            Value::Int64(..) => Value::Int64(Some(0)),
            Value::UInt8(..) => Value::UInt8(Some(0)),
            Value::UInt16(..) => Value::UInt16(Some(0)),
            Value::UInt32(..) => Value::UInt32(Some(0)),
            Value::UInt64(..) => Value::UInt64(Some(0)),
            Value::Float32(..) => Value::Float32(Some(0.0)),
            Value::Float64(..) => Value::Float64(Some(0.0)),
            Value::Decimal(..) => Value::Decimal(Some(Decimal::ZERO)),
            Value::Char(..) => Value::Char(Some('\0')),
            Value::Varchar(..) => Value::Varchar(Some(String::new())),
            Value::Blob(..) => Value::Blob(Some(Box::default())),
            Value::Date(..) => Value::Date(Some(MIN_DATE)),
            Value::Time(..) => Value::Time(Some(Time::MIDNIGHT)),
            Value::Timestamp(..) => {
                Value::Timestamp(Some(PrimitiveDateTime::new(MIN_DATE, Time::MIDNIGHT)))
            }
            Value::TimestampWithTimezone(..) => Value::TimestampWithTimezone(Some(
                PrimitiveDateTime::new(MIN_DATE, Time::MIDNIGHT).assume_offset(UtcOffset::UTC),
            )),
            Value::Uuid(..) => Value::Uuid(Some(Uuid::nil())),
            Value::Enum(.., members) => Value::Enum(Some(0), members),
        }
    }

    /// Name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Boolean(..) => "Boolean",
            Value::Int8(..) => "Int8",
            Value::Int16(..) => "Int16",
            Value::Int32(..) => "Int32",
            Value::Int64(..) => "Int64",
            Value::UInt8(..) => "UInt8",
            Value::UInt16(..) => "UInt16",
            Value::UInt32(..) => "UInt32",
            Value::UInt64(..) => "UInt64",
            Value::Float32(..) => "Float32",
            Value::Float64(..) => "Float64",
            Value::Decimal(..) => "Decimal",
            Value::Char(..) => "Char",
            Value::Varchar(..) => "Varchar",
            Value::Blob(..) => "Blob",
            Value::Date(..) => "Date",
            Value::Time(..) => "Time",
            Value::Timestamp(..) => "Timestamp",
            Value::TimestampWithTimezone(..) => "TimestampWithTimezone",
            Value::Uuid(..) => "Uuid",
            Value::Enum(..) => "Enum",
        }
    }
}

/// `0001-01-01`, the smallest date a timestamp column defaults to.
pub(crate) const MIN_DATE: Date = match Date::from_calendar_date(1, Month::January, 1) {
    Ok(date) => date,
    Err(..) => Date::MIN,
};

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Boolean(l), Self::Boolean(r)) => l == r,
            (Self::Int8(l), Self::Int8(r)) => l == r,
            (Self::Int16(l), Self::Int16(r)) => l == r,
            (Self::Int32(l), Self::Int32(r)) => l == r,
            (Self::Int64(l), Self::Int64(r)) => l == r,
            (Self::UInt8(l), Self::UInt8(r)) => l == r,
            (Self::UInt16(l), Self::UInt16(r)) => l == r,
            (Self::UInt32(l), Self::UInt32(r)) => l == r,
            (Self::UInt64(l), Self::UInt64(r)) => l == r,
            (Self::Float32(l), Self::Float32(r)) => l == r,
            (Self::Float64(l), Self::Float64(r)) => l == r,
            (Self::Decimal(l), Self::Decimal(r)) => l == r,
            (Self::Char(l), Self::Char(r)) => l == r,
            (Self::Varchar(l), Self::Varchar(r)) => l == r,
            (Self::Blob(l), Self::Blob(r)) => l == r,
            (Self::Date(l), Self::Date(r)) => l == r,
            (Self::Time(l), Self::Time(r)) => l == r,
            (Self::Timestamp(l), Self::Timestamp(r)) => l == r,
            (Self::TimestampWithTimezone(l), Self::TimestampWithTimezone(r)) => l == r,
            (Self::Uuid(l), Self::Uuid(r)) => l == r,
            (Self::Enum(l, ..), Self::Enum(r, ..)) => l == r && self.same_type(other),
            _ => false,
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Boolean(v) => f.debug_tuple("Boolean").field(v).finish(),
            Value::Int8(v) => f.debug_tuple("Int8").field(v).finish(),
            Value::Int16(v) => f.debug_tuple("Int16").field(v).finish(),
            Value::Int32(v) => f.debug_tuple("Int32").field(v).finish(),
            Value::Int64(v) => f.debug_tuple("Int64").field(v).finish(),
            Value::UInt8(v) => f.debug_tuple("UInt8").field(v).finish(),
            Value::UInt16(v) => f.debug_tuple("UInt16").field(v).finish(),
            Value::UInt32(v) => f.debug_tuple("UInt32").field(v).finish(),
            Value::UInt64(v) => f.debug_tuple("UInt64").field(v).finish(),
            Value::Float32(v) => f.debug_tuple("Float32").field(v).finish(),
            Value::Float64(v) => f.debug_tuple("Float64").field(v).finish(),
            Value::Decimal(v) => f.debug_tuple("Decimal").field(v).finish(),
            Value::Char(v) => f.debug_tuple("Char").field(v).finish(),
            Value::Varchar(v) => f.debug_tuple("Varchar").field(v).finish(),
            Value::Blob(v) => f.debug_tuple("Blob").field(v).finish(),
            Value::Date(v) => f.debug_tuple("Date").field(v).finish(),
            Value::Time(v) => f.debug_tuple("Time").field(v).finish(),
            Value::Timestamp(v) => f.debug_tuple("Timestamp").field(v).finish(),
            Value::TimestampWithTimezone(v) => {
                f.debug_tuple("TimestampWithTimezone").field(v).finish()
            }
            Value::Uuid(v) => f.debug_tuple("Uuid").field(v).finish(),
            Value::Enum(v, members) => {
                let name = v.and_then(|v| members.iter().find(|m| m.ordinal == v));
                match name {
                    Some(member) => write!(f, "Enum({})", member.name),
                    None => f.debug_tuple("Enum").field(v).finish(),
                }
            }
        }
    }
}
