use crate::{Error, Result, truncate_long};
use anyhow::Context;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, macros::format_description};
use uuid::Uuid;

/// Parsing of the textual representation of a value, as returned by data
/// sources that store everything as text.
pub trait Parse {
    fn parse(value: impl AsRef<str>) -> Result<Self>
    where
        Self: Sized;
}

impl Parse for bool {
    fn parse(value: impl AsRef<str>) -> Result<Self> {
        let value = value.as_ref().trim();
        match value.to_ascii_lowercase().as_str() {
            "true" | "t" | "1" => Ok(true),
            "false" | "f" | "0" => Ok(false),
            _ => Err(Error::msg(format!(
                "Cannot parse '{}' as bool",
                truncate_long!(value)
            ))),
        }
    }
}

impl Parse for Date {
    fn parse(value: impl AsRef<str>) -> Result<Self> {
        let value = value.as_ref().trim();
        Date::parse(value, format_description!("[year]-[month]-[day]"))
            .or_else(|_| <PrimitiveDateTime as Parse>::parse(value).map(|v| v.date()))
            .with_context(|| format!("Cannot parse '{}' as time::Date", value))
    }
}

impl Parse for Time {
    fn parse(value: impl AsRef<str>) -> Result<Self> {
        let value = value.as_ref().trim();
        Time::parse(
            value,
            format_description!("[hour]:[minute]:[second].[subsecond]"),
        )
        .or(Time::parse(
            value,
            format_description!("[hour]:[minute]:[second]"),
        ))
        .or(Time::parse(value, format_description!("[hour]:[minute]")))
        .with_context(|| format!("Cannot parse '{}' as time::Time", value))
    }
}

impl Parse for PrimitiveDateTime {
    fn parse(value: impl AsRef<str>) -> Result<Self> {
        let value = value.as_ref().trim();
        PrimitiveDateTime::parse(
            value,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
        )
        .or(PrimitiveDateTime::parse(
            value,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        ))
        .or(PrimitiveDateTime::parse(
            value,
            format_description!("[year]-[month]-[day]T[hour]:[minute]"),
        ))
        .or(PrimitiveDateTime::parse(
            value,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
        ))
        .or(PrimitiveDateTime::parse(
            value,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        ))
        .or(PrimitiveDateTime::parse(
            value,
            format_description!("[year]-[month]-[day] [hour]:[minute]"),
        ))
        .or(
            Date::parse(value, format_description!("[year]-[month]-[day]"))
                .map(|v| v.midnight()),
        )
        .with_context(|| format!("Cannot parse '{}' as time::PrimitiveDateTime", value))
    }
}

impl Parse for OffsetDateTime {
    fn parse(value: impl AsRef<str>) -> Result<Self> {
        let value = value.as_ref().trim();
        // Accept the space separated form and the `Z` designator as well
        let value = value.replacen(' ', "T", 1);
        let value = match value.strip_suffix(['Z', 'z']) {
            Some(v) => format!("{v}+00:00"),
            None => value,
        };
        let value = value.as_str();
        OffsetDateTime::parse(
            value,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory]:[offset_minute]")
        )
        .or(OffsetDateTime::parse(
            value,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory]")
        ))
        .or(OffsetDateTime::parse(
            value,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]")
        ))
        .or(OffsetDateTime::parse(
            value,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]")
        ))
        .or(OffsetDateTime::parse(
            value,
            format_description!("[year]-[month]-[day]T[hour]:[minute][offset_hour sign:mandatory]:[offset_minute]")
        ))
        .with_context(|| format!("Cannot parse '{}' as time::OffsetDateTime", value))
    }
}

impl Parse for Uuid {
    fn parse(value: impl AsRef<str>) -> Result<Self> {
        let value = value.as_ref().trim();
        Uuid::parse_str(value).with_context(|| format!("Cannot parse '{}' as uuid::Uuid", value))
    }
}
