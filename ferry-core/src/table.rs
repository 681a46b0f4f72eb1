use crate::{ColumnDef, MappingError, Result};
use std::borrow::Cow;

/// Where a table lives: `[catalog.][schema.]name`. Empty parts are omitted.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub name: Cow<'static, str>,
    pub schema: Cow<'static, str>,
    pub catalog: Cow<'static, str>,
}

impl TableRef {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_schema(mut self, schema: impl Into<Cow<'static, str>>) -> Self {
        self.schema = schema.into();
        self
    }

    pub fn with_catalog(mut self, catalog: impl Into<Cow<'static, str>>) -> Self {
        self.catalog = catalog.into();
        self
    }

    /// Unquoted dotted name, for messages.
    pub fn full_name(&self) -> String {
        [&self.catalog, &self.schema, &self.name]
            .into_iter()
            .filter(|v| !v.is_empty())
            .map(|v| v.as_ref())
            .collect::<Vec<&str>>()
            .join(".")
    }
}

/// Resolved description of an entity type: its table and its columns.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDef {
    table: TableRef,
    columns: Vec<ColumnDef>,
    identity: Option<usize>,
}

impl TableDef {
    /// Validates the columns and locates the identity.
    ///
    /// A single column flagged as identity wins. Without one, the field named
    /// exactly `Id` becomes the identity, other spellings like `id` do not. Two
    /// or more flagged columns fail with [`MappingError::AmbiguousIdentity`].
    pub fn new(entity: &str, table: TableRef, mut columns: Vec<ColumnDef>) -> Result<Self> {
        let marked: Vec<usize> = columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.identity)
            .map(|(i, _)| i)
            .collect();
        let identity = match marked.as_slice() {
            [] => columns.iter().position(|c| c.field == "Id"),
            [index] => Some(*index),
            _ => {
                let error = MappingError::AmbiguousIdentity {
                    entity: entity.into(),
                    columns: marked
                        .iter()
                        .map(|i| columns[*i].field.to_string())
                        .collect(),
                };
                log::error!("{:#}", error);
                return Err(error.into());
            }
        };
        if let Some(index) = identity {
            columns[index].identity = true;
        }
        Ok(Self {
            table,
            columns,
            identity,
        })
    }

    pub fn table(&self) -> &TableRef {
        &self.table
    }

    pub fn name(&self) -> &str {
        &self.table.name
    }

    pub fn schema(&self) -> &str {
        &self.table.schema
    }

    pub fn catalog(&self) -> &str {
        &self.table.catalog
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn identity(&self) -> Option<&ColumnDef> {
        self.identity.map(|i| &self.columns[i])
    }

    /// The identity column or [`MappingError::MissingIdentityColumn`].
    pub fn require_identity(&self) -> Result<&ColumnDef> {
        self.identity().ok_or_else(|| {
            MappingError::MissingIdentityColumn {
                table: self.table.full_name(),
            }
            .into()
        })
    }

    /// Column by physical name first, then by logical name.
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.column_index(name).map(|i| &self.columns[i])
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .or_else(|| self.columns.iter().position(|c| c.field == name))
    }

    /// Writable columns sent by insert and update, in declaration order.
    pub fn persisted_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| c.is_persisted())
    }
}
