use crate::{ColumnDef, Result, TableDef, TableRef, Value};
use std::any;

/// A plain data type whose fields map to the columns of one table.
///
/// Implemented by `#[derive(Entity)]`:
/// ```ignore
/// #[derive(Default, Entity)]
/// #[ferry(name = "Characters", schema = "main")]
/// struct Character {
///     #[ferry(identity, name = "ID")]
///     id: i64,
///     first_name: String,
///     #[ferry(computed)]
///     full_name: String,
///     #[ferry(skip)]
///     cache: Vec<u8>,
/// }
/// ```
pub trait Entity: Default + Send + Sync + 'static {
    /// Table this entity maps to.
    fn table_ref() -> TableRef;

    /// One column per mapped field, in declaration order.
    fn columns() -> Vec<ColumnDef>;

    /// Current value of the field with logical name `field`.
    fn column_value(&self, field: &str) -> Option<Value>;

    /// Assigns the field with logical name `field`, converting `value` to its type.
    ///
    /// Unknown fields are ignored.
    fn set_column_value(&mut self, field: &str, value: Value) -> Result<()>;

    /// Builds the table description, usually obtained through [`crate::Registry::resolve`].
    fn table_def() -> Result<TableDef> {
        TableDef::new(any::type_name::<Self>(), Self::table_ref(), Self::columns())
    }
}
