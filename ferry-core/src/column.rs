use crate::Value;
use std::borrow::Cow;

/// Mapping between one entity field and one table column.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// Physical column name.
    pub name: Cow<'static, str>,
    /// Logical name: the field of the entity.
    pub field: Cow<'static, str>,
    /// Type descriptor of the field.
    pub value: Value,
    pub nullable: bool,
    pub identity: bool,
    /// Populated by the database, never part of insert and update lists.
    pub computed: bool,
    pub readable: bool,
    pub writable: bool,
}

impl ColumnDef {
    /// Readable and writable column named after its field.
    pub fn new(field: impl Into<Cow<'static, str>>, value: Value) -> Self {
        let field = field.into();
        Self {
            name: field.clone(),
            field,
            value,
            nullable: false,
            identity: false,
            computed: false,
            readable: true,
            writable: true,
        }
    }

    /// Columns whose value is sent to the database by insert and update.
    pub fn is_persisted(&self) -> bool {
        self.readable && self.writable && !self.computed && !self.identity
    }

    /// Matches either the physical or the logical name.
    pub fn is_named(&self, name: &str) -> bool {
        self.name == name || self.field == name
    }
}
