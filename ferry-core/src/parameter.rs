use crate::Value;
use std::{
    borrow::Cow,
    ops::{Index, IndexMut},
    slice, vec,
};

/// Database type hint for drivers that need one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbType {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Decimal,
    Char,
    String,
    Binary,
    Date,
    Time,
    Timestamp,
    TimestampWithTimezone,
    Uuid,
}

impl DbType {
    /// Hint matching the type of `value`, `None` for untyped nulls.
    pub fn of(value: &Value) -> Option<Self> {
        Some(match value {
            Value::Null => return None,
            Value::Boolean(..) => Self::Boolean,
            Value::Int8(..) => Self::Int8,
            Value::Int16(..) => Self::Int16,
            Value::Int32(..) => Self::Int32,
            Value::Int64(..) | Value::Enum(..) => Self::Int64,
            Value::UInt8(..) => Self::UInt8,
            Value::UInt16(..) => Self::UInt16,
            Value::UInt32(..) => Self::UInt32,
            Value::UInt64(..) => Self::UInt64,
            Value::Float32(..) => Self::Float32,
            Value::Float64(..) => Self::Float64,
            Value::Decimal(..) => Self::Decimal,
            Value::Char(..) => Self::Char,
            Value::Varchar(..) => Self::String,
            Value::Blob(..) => Self::Binary,
            Value::Date(..) => Self::Date,
            Value::Time(..) => Self::Time,
            Value::Timestamp(..) => Self::Timestamp,
            Value::TimestampWithTimezone(..) => Self::TimestampWithTimezone,
            Value::Uuid(..) => Self::Uuid,
        })
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ParameterDirection {
    #[default]
    Input,
    Output,
    InputOutput,
    ReturnValue,
}

/// Named value bound to a command placeholder.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Parameter {
    pub name: Cow<'static, str>,
    /// Never absent: a missing value is [`Value::Null`].
    pub value: Value,
    pub db_type: Option<DbType>,
    pub direction: Option<ParameterDirection>,
    pub precision: Option<u8>,
    pub scale: Option<u8>,
    pub size: Option<usize>,
}

impl Parameter {
    /// Typed nulls are normalized to [`Value::Null`].
    pub fn new(name: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        let value = value.into();
        Self {
            name: name.into(),
            value: if value.is_null() { Value::Null } else { value },
            ..Default::default()
        }
    }

    pub fn db_type(mut self, db_type: DbType) -> Self {
        self.db_type = Some(db_type);
        self
    }

    pub fn direction(mut self, direction: ParameterDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn precision(mut self, precision: u8) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn scale(mut self, scale: u8) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn is_output(&self) -> bool {
        matches!(
            self.direction,
            Some(
                ParameterDirection::Output
                    | ParameterDirection::InputOutput
                    | ParameterDirection::ReturnValue
            )
        )
    }

    /// Name without its placeholder prefix.
    pub fn bare_name(&self) -> &str {
        self.name.trim_start_matches(['@', ':', '$', '?'])
    }

    fn is_named(&self, name: &str) -> bool {
        self.name == name || self.bare_name() == name.trim_start_matches(['@', ':', '$', '?'])
    }
}

/// Ordered list of parameters.
///
/// Lookups by name ignore the placeholder prefix: `get("ID")` finds `@ID`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Parameters(Vec<Parameter>);

impl Parameters {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push(&mut self, parameter: Parameter) {
        self.0.push(parameter);
    }

    pub fn add(&mut self, name: impl Into<Cow<'static, str>>, value: impl Into<Value>) {
        self.push(Parameter::new(name, value));
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.0.iter().find(|p| p.is_named(name))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.0.iter_mut().find(|p| p.is_named(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|p| p.is_named(name))
    }

    pub fn remove(&mut self, name: &str) -> Option<Parameter> {
        self.index_of(name).map(|i| self.0.remove(i))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Parameter> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, Parameter> {
        self.0.iter_mut()
    }
}

impl Index<usize> for Parameters {
    type Output = Parameter;
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IndexMut<usize> for Parameters {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl IntoIterator for Parameters {
    type Item = Parameter;
    type IntoIter = vec::IntoIter<Parameter>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = &'a Parameter;
    type IntoIter = slice::Iter<'a, Parameter>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Parameter> for Parameters {
    fn from_iter<T: IntoIterator<Item = Parameter>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Parameter> for Parameters {
    fn extend<T: IntoIterator<Item = Parameter>>(&mut self, iter: T) {
        self.0.extend(iter)
    }
}

impl From<Vec<Parameter>> for Parameters {
    fn from(value: Vec<Parameter>) -> Self {
        Self(value)
    }
}

/// Positional parameters named `?1`, `?2`, ...
impl From<Vec<Value>> for Parameters {
    fn from(value: Vec<Value>) -> Self {
        value
            .into_iter()
            .enumerate()
            .map(|(i, v)| Parameter::new(format!("?{}", i + 1), v))
            .collect()
    }
}

impl<N, V, const L: usize> From<[(N, V); L]> for Parameters
where
    N: Into<Cow<'static, str>>,
    V: Into<Value>,
{
    fn from(value: [(N, V); L]) -> Self {
        value
            .into_iter()
            .map(|(n, v)| Parameter::new(n, v))
            .collect()
    }
}

impl<N, V> From<Vec<(N, V)>> for Parameters
where
    N: Into<Cow<'static, str>>,
    V: Into<Value>,
{
    fn from(value: Vec<(N, V)>) -> Self {
        value
            .into_iter()
            .map(|(n, v)| Parameter::new(n, v))
            .collect()
    }
}
