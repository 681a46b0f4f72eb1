use crate::{EnumMember, Error, MappingError, Parse, Result, Value};
use atoi::FromRadix10SignedChecked;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};
use uuid::Uuid;

/// Converts `value` into the type described by `target`.
///
/// `target` is a type descriptor, usually the payload-less variant returned by
/// [`crate::AsValue::as_empty_value`]. The rules, in order:
/// 1. A null value becomes the "no value" variant of `target` when `nullable`,
///    its zero value otherwise (`false`, `0`, `""`, `0001-01-01`, ...).
/// 2. Enumeration targets accept a member name (case insensitive) or any value
///    convertible to an integral ordinal. Ordinals are kept even when they do
///    not name a declared member.
/// 3. A value that already has the target type is returned unchanged.
/// 4. Otherwise a standard, locale independent conversion is attempted and
///    [`MappingError::UnconvertibleValue`] is returned when there is none.
pub fn coerce(value: Value, target: &Value, nullable: bool) -> Result<Value> {
    if value.is_null() {
        return Ok(if nullable {
            target.as_null()
        } else {
            target.as_zero()
        });
    }
    if let Value::Enum(.., members) = target {
        return coerce_enum(value, target, members);
    }
    if matches!(target, Value::Null) || value.same_type(target) {
        return Ok(value);
    }
    let value = match value {
        Value::Enum(Some(v), members) => {
            if let Value::Varchar(..) = target {
                let name = match EnumMember::find_by_ordinal(members, v) {
                    Some(member) => member.name.to_string(),
                    None => v.to_string(),
                };
                return Ok(Value::Varchar(Some(name)));
            }
            Value::Int64(Some(v))
        }
        v => v,
    };
    Ok(match target {
        Value::Boolean(..) => Value::Boolean(Some(to_bool(&value, target)?)),
        Value::Int8(..) => Value::Int8(Some(to_integer(&value, target)?)),
        Value::Int16(..) => Value::Int16(Some(to_integer(&value, target)?)),
        Value::Int32(..) => Value::Int32(Some(to_integer(&value, target)?)),
        Value::Int64(..) => Value::Int64(Some(to_integer(&value, target)?)),
        Value::UInt8(..) => Value::UInt8(Some(to_integer(&value, target)?)),
        Value::UInt16(..) => Value::UInt16(Some(to_integer(&value, target)?)),
        Value::UInt32(..) => Value::UInt32(Some(to_integer(&value, target)?)),
        Value::UInt64(..) => Value::UInt64(Some(to_integer(&value, target)?)),
        Value::Float32(..) => Value::Float32(Some(to_f32(&value, target)?)),
        Value::Float64(..) => Value::Float64(Some(to_f64(&value, target)?)),
        Value::Decimal(..) => Value::Decimal(Some(to_decimal(&value, target)?)),
        Value::Char(..) => Value::Char(Some(to_char(&value, target)?)),
        Value::Varchar(..) => Value::Varchar(Some(to_string(&value, target)?)),
        Value::Blob(..) => Value::Blob(Some(to_blob(&value, target)?)),
        Value::Date(..) => Value::Date(Some(to_date(&value, target)?)),
        Value::Time(..) => Value::Time(Some(to_time(&value, target)?)),
        Value::Timestamp(..) => Value::Timestamp(Some(to_timestamp(&value, target)?)),
        Value::TimestampWithTimezone(..) => {
            Value::TimestampWithTimezone(Some(to_timestamp_with_timezone(&value, target)?))
        }
        Value::Uuid(..) => Value::Uuid(Some(to_uuid(&value, target)?)),
        Value::Null | Value::Enum(..) => value,
    })
}

fn coerce_enum(value: Value, target: &Value, members: &'static [EnumMember]) -> Result<Value> {
    let name = match value {
        Value::Varchar(Some(ref v)) => v.clone(),
        Value::Char(Some(v)) => v.to_string(),
        Value::Enum(Some(v), ..) => return Ok(Value::Enum(Some(v), members)),
        ref other => return Ok(Value::Enum(Some(to_integer(other, target)?), members)),
    };
    match EnumMember::find_by_name(members, &name) {
        Some(member) => Ok(Value::Enum(Some(member.ordinal), members)),
        None => Err(MappingError::InvalidEnumValue {
            enumeration: members
                .iter()
                .map(|m| m.name)
                .collect::<Vec<_>>()
                .join("|"),
            value: name,
        }
        .into()),
    }
}

fn unconvertible(value: &Value, target: &Value) -> Error {
    MappingError::UnconvertibleValue {
        value: format!("{value:?}"),
        target: target.type_name().into(),
    }
    .into()
}

fn float_to_i128(v: f64, value: &Value, target: &Value) -> Result<i128> {
    let rounded = v.round_ties_even();
    if !rounded.is_finite() || rounded < i128::MIN as f64 || rounded >= i128::MAX as f64 {
        return Err(unconvertible(value, target));
    }
    Ok(rounded as i128)
}

fn parse_integer(v: &str) -> Option<i128> {
    let v = v.trim();
    match i128::from_radix_10_signed_checked(v.as_bytes()) {
        (Some(result), len) if len == v.len() && len > 0 => Some(result),
        _ => None,
    }
}

fn to_integer<T: TryFrom<i128>>(value: &Value, target: &Value) -> Result<T> {
    let wide = match value {
        Value::Boolean(Some(v)) => *v as i128,
        Value::Int8(Some(v)) => *v as i128,
        Value::Int16(Some(v)) => *v as i128,
        Value::Int32(Some(v)) => *v as i128,
        Value::Int64(Some(v)) => *v as i128,
        Value::UInt8(Some(v)) => *v as i128,
        Value::UInt16(Some(v)) => *v as i128,
        Value::UInt32(Some(v)) => *v as i128,
        Value::UInt64(Some(v)) => *v as i128,
        Value::Float32(Some(v)) => float_to_i128(*v as f64, value, target)?,
        Value::Float64(Some(v)) => float_to_i128(*v, value, target)?,
        Value::Decimal(Some(v)) => v
            .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
            .to_i128()
            .ok_or_else(|| unconvertible(value, target))?,
        Value::Char(Some(v)) => *v as u32 as i128,
        Value::Varchar(Some(v)) => parse_integer(v).ok_or_else(|| unconvertible(value, target))?,
        Value::Enum(Some(v), ..) => *v as i128,
        _ => return Err(unconvertible(value, target)),
    };
    T::try_from(wide).map_err(|_| unconvertible(value, target))
}

fn to_f64(value: &Value, target: &Value) -> Result<f64> {
    Ok(match value {
        Value::Boolean(Some(v)) => *v as u8 as f64,
        Value::Int8(Some(v)) => *v as f64,
        Value::Int16(Some(v)) => *v as f64,
        Value::Int32(Some(v)) => *v as f64,
        Value::Int64(Some(v)) => *v as f64,
        Value::UInt8(Some(v)) => *v as f64,
        Value::UInt16(Some(v)) => *v as f64,
        Value::UInt32(Some(v)) => *v as f64,
        Value::UInt64(Some(v)) => *v as f64,
        Value::Float32(Some(v)) => *v as f64,
        Value::Float64(Some(v)) => *v,
        Value::Decimal(Some(v)) => v.to_f64().ok_or_else(|| unconvertible(value, target))?,
        Value::Varchar(Some(v)) => {
            fast_float::parse::<f64, _>(v.trim()).map_err(|_| unconvertible(value, target))?
        }
        _ => return Err(unconvertible(value, target)),
    })
}

fn to_f32(value: &Value, target: &Value) -> Result<f32> {
    if let Value::Varchar(Some(v)) = value {
        return fast_float::parse::<f32, _>(v.trim()).map_err(|_| unconvertible(value, target));
    }
    let v = to_f64(value, target)?;
    let result = v as f32;
    if v.is_finite() && result.is_infinite() {
        return Err(unconvertible(value, target));
    }
    Ok(result)
}

fn to_decimal(value: &Value, target: &Value) -> Result<Decimal> {
    let result = match value {
        Value::Boolean(Some(v)) => Some(Decimal::from(*v as u8)),
        Value::Float32(Some(v)) => Decimal::from_f32(*v),
        Value::Float64(Some(v)) => Decimal::from_f64(*v),
        Value::Varchar(Some(v)) => v
            .trim()
            .parse::<Decimal>()
            .ok()
            .or_else(|| Decimal::from_scientific(v.trim()).ok()),
        Value::Char(..) => None,
        other => Decimal::from_i128(to_integer::<i128>(other, target)?),
    };
    result.ok_or_else(|| unconvertible(value, target))
}

fn to_bool(value: &Value, target: &Value) -> Result<bool> {
    Ok(match value {
        Value::Float32(Some(v)) => *v != 0.0,
        Value::Float64(Some(v)) => *v != 0.0,
        Value::Decimal(Some(v)) => !v.is_zero(),
        Value::Varchar(Some(v)) => {
            <bool as Parse>::parse(v).map_err(|_| unconvertible(value, target))?
        }
        Value::Char(Some(v)) => {
            <bool as Parse>::parse(v.to_string()).map_err(|_| unconvertible(value, target))?
        }
        other => to_integer::<i128>(other, target)? != 0,
    })
}

fn to_char(value: &Value, target: &Value) -> Result<char> {
    match value {
        Value::Varchar(Some(v)) => {
            let mut chars = v.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(unconvertible(value, target)),
            }
        }
        Value::Boolean(..) | Value::Float32(..) | Value::Float64(..) | Value::Decimal(..) => {
            Err(unconvertible(value, target))
        }
        other => char::from_u32(to_integer::<u32>(other, target)?)
            .ok_or_else(|| unconvertible(value, target)),
    }
}

fn to_string(value: &Value, target: &Value) -> Result<String> {
    Ok(match value {
        Value::Boolean(Some(v)) => String::from(if *v { "true" } else { "false" }),
        Value::Int8(Some(v)) => itoa::Buffer::new().format(*v).into(),
        Value::Int16(Some(v)) => itoa::Buffer::new().format(*v).into(),
        Value::Int32(Some(v)) => itoa::Buffer::new().format(*v).into(),
        Value::Int64(Some(v)) => itoa::Buffer::new().format(*v).into(),
        Value::UInt8(Some(v)) => itoa::Buffer::new().format(*v).into(),
        Value::UInt16(Some(v)) => itoa::Buffer::new().format(*v).into(),
        Value::UInt32(Some(v)) => itoa::Buffer::new().format(*v).into(),
        Value::UInt64(Some(v)) => itoa::Buffer::new().format(*v).into(),
        Value::Float32(Some(v)) => ryu::Buffer::new().format(*v).into(),
        Value::Float64(Some(v)) => ryu::Buffer::new().format(*v).into(),
        Value::Decimal(Some(v)) => v.to_string(),
        Value::Char(Some(v)) => v.to_string(),
        Value::Blob(Some(v)) => hex::encode(v),
        Value::Date(Some(v)) => format_date(v),
        Value::Time(Some(v)) => format_time(v),
        Value::Timestamp(Some(v)) => {
            format!("{} {}", format_date(&v.date()), format_time(&v.time()))
        }
        Value::TimestampWithTimezone(Some(v)) => format!(
            "{} {}{}",
            format_date(&v.date()),
            format_time(&v.time()),
            format_offset(&v.offset())
        ),
        Value::Uuid(Some(v)) => v.to_string(),
        _ => return Err(unconvertible(value, target)),
    })
}

fn to_blob(value: &Value, target: &Value) -> Result<Box<[u8]>> {
    match value {
        Value::Varchar(Some(v)) => Ok(v.as_bytes().into()),
        Value::Uuid(Some(v)) => Ok(v.as_bytes().as_slice().into()),
        _ => Err(unconvertible(value, target)),
    }
}

fn to_date(value: &Value, target: &Value) -> Result<Date> {
    match value {
        Value::Varchar(Some(v)) => <Date as Parse>::parse(v).map_err(|_| unconvertible(value, target)),
        Value::Timestamp(Some(v)) => Ok(v.date()),
        Value::TimestampWithTimezone(Some(v)) => Ok(v.date()),
        _ => Err(unconvertible(value, target)),
    }
}

fn to_time(value: &Value, target: &Value) -> Result<Time> {
    match value {
        Value::Varchar(Some(v)) => {
            <Time as Parse>::parse(v).map_err(|_| unconvertible(value, target))
        }
        Value::Timestamp(Some(v)) => Ok(v.time()),
        Value::TimestampWithTimezone(Some(v)) => Ok(v.time()),
        _ => Err(unconvertible(value, target)),
    }
}

fn to_timestamp(value: &Value, target: &Value) -> Result<PrimitiveDateTime> {
    match value {
        Value::Varchar(Some(v)) => <PrimitiveDateTime as Parse>::parse(v)
            .or_else(|_| {
                <OffsetDateTime as Parse>::parse(v).map(|v| {
                    let v = v.to_offset(UtcOffset::UTC);
                    PrimitiveDateTime::new(v.date(), v.time())
                })
            })
            .map_err(|_| unconvertible(value, target)),
        Value::Date(Some(v)) => Ok(v.midnight()),
        Value::TimestampWithTimezone(Some(v)) => {
            let v = v.to_offset(UtcOffset::UTC);
            Ok(PrimitiveDateTime::new(v.date(), v.time()))
        }
        _ => Err(unconvertible(value, target)),
    }
}

fn to_timestamp_with_timezone(value: &Value, target: &Value) -> Result<OffsetDateTime> {
    match value {
        Value::Varchar(Some(v)) => <OffsetDateTime as Parse>::parse(v)
            .or_else(|_| <PrimitiveDateTime as Parse>::parse(v).map(|v| v.assume_utc()))
            .map_err(|_| unconvertible(value, target)),
        Value::Date(Some(v)) => Ok(v.midnight().assume_utc()),
        Value::Timestamp(Some(v)) => Ok(v.assume_utc()),
        _ => Err(unconvertible(value, target)),
    }
}

fn to_uuid(value: &Value, target: &Value) -> Result<Uuid> {
    match value {
        Value::Varchar(Some(v)) => {
            <Uuid as Parse>::parse(v).map_err(|_| unconvertible(value, target))
        }
        Value::Blob(Some(v)) => Uuid::from_slice(v).map_err(|_| unconvertible(value, target)),
        _ => Err(unconvertible(value, target)),
    }
}

fn format_date(v: &Date) -> String {
    format!("{:04}-{:02}-{:02}", v.year(), v.month() as u8, v.day())
}

fn format_time(v: &Time) -> String {
    let mut result = format!("{:02}:{:02}:{:02}", v.hour(), v.minute(), v.second());
    if v.nanosecond() != 0 {
        let fraction = format!("{:09}", v.nanosecond());
        result.push('.');
        result.push_str(fraction.trim_end_matches('0'));
    }
    result
}

fn format_offset(v: &UtcOffset) -> String {
    let (h, m, _) = v.as_hms();
    let sign = if v.is_negative() { '-' } else { '+' };
    format!("{sign}{:02}:{:02}", h.unsigned_abs(), m.unsigned_abs())
}
