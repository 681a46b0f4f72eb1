use crate::{AsValue, Result, RowLabeled, Value, change_type};
use std::{ops::Index, slice, vec};

/// Dynamic row: ordered `(name, value)` pairs with unique names.
///
/// Built from a row it keeps the column order of the row; when a name repeats
/// only its first occurrence is kept.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds the entry unless `name` is already present, returns whether it was added.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.entries.push((name, value.into()));
        true
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Value of `name` converted to `T`, a missing entry counts as `NULL`.
    pub fn get_as<T: AsValue>(&self, name: &str) -> Result<T> {
        change_type(self.get(name).cloned().unwrap_or_default())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> slice::Iter<'_, (String, Value)> {
        self.entries.iter()
    }
}

impl From<RowLabeled> for Record {
    fn from(row: RowLabeled) -> Self {
        let mut result = Record {
            entries: Vec::with_capacity(row.len()),
        };
        for (name, value) in row.labels.iter().zip(row.values.into_vec()) {
            result.insert(name.as_str(), value);
        }
        result
    }
}

impl Index<&str> for Record {
    type Output = Value;
    /// Panics when `name` is missing.
    fn index(&self, name: &str) -> &Self::Output {
        match self.get(name) {
            Some(v) => v,
            None => panic!("Record has no entry named `{name}`"),
        }
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = vec::IntoIter<(String, Value)>;
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a (String, Value);
    type IntoIter = slice::Iter<'a, (String, Value)>;
    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
