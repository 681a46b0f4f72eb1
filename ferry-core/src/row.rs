use crate::Value;
use std::sync::Arc;

/// Outcome of a statement that modifies rows.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowsAffected {
    pub rows_affected: u64,
    /// Identity of the last inserted row, when the driver knows it.
    pub last_affected_id: Option<i64>,
}

/// Column names shared by every row of a result set.
pub type RowNames = Arc<[String]>;
/// Values of a row, aligned with its `RowNames`.
pub type Row = Box<[Value]>;

/// One result row: column names and values, in the order the data source
/// returned them. Names may repeat.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLabeled {
    pub labels: RowNames,
    pub values: Row,
}

impl RowLabeled {
    pub fn new(labels: RowNames, values: Row) -> Self {
        Self { labels, values }
    }

    pub fn names(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of the first column named `name`.
    pub fn get_column(&self, name: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|v| v == name)
            .map(|i| &self.values[i])
    }

    /// Iterates `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Columns `start..end` as a row on their own.
    pub fn slice(&self, start: usize, end: usize) -> RowLabeled {
        RowLabeled {
            labels: self.labels[start..end].into(),
            values: self.values[start..end].into(),
        }
    }
}

impl<N: Into<String>, V: Into<Value>> FromIterator<(N, V)> for RowLabeled {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let (labels, values): (Vec<String>, Vec<Value>) = iter
            .into_iter()
            .map(|(n, v)| (n.into(), v.into()))
            .unzip();
        Self {
            labels: labels.into(),
            values: values.into(),
        }
    }
}

/// Item produced by [`crate::Executor::run`]: a row or the effect of a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Row(RowLabeled),
    Affected(RowsAffected),
}

impl Extend<RowsAffected> for RowsAffected {
    fn extend<T: IntoIterator<Item = RowsAffected>>(&mut self, iter: T) {
        for elem in iter {
            self.rows_affected += elem.rows_affected;
            if elem.last_affected_id.is_some() {
                self.last_affected_id = elem.last_affected_id;
            }
        }
    }
}

impl From<RowLabeled> for QueryResult {
    fn from(value: RowLabeled) -> Self {
        QueryResult::Row(value)
    }
}

impl From<RowsAffected> for QueryResult {
    fn from(value: RowsAffected) -> Self {
        QueryResult::Affected(value)
    }
}
