use crate::{
    ColumnDef, Command, DbType, Dialect, Entity, MappingError, Parameter, ParameterDirection,
    Parameters, Registry, Result, ReturningStyle, TableDef, Value, separated_by,
};

/// Generates the single table commands of an entity type.
///
/// Every command is a single line of SQL without trailing semicolon, whose
/// parameters are named after the columns they bind (`@ID`, `@firstName`).
#[derive(Debug, Clone)]
pub struct CommandBuilder<'r> {
    dialect: Dialect,
    registry: &'r Registry,
}

impl<'r> CommandBuilder<'r> {
    pub fn new(dialect: Dialect, registry: &'r Registry) -> Self {
        Self { dialect, registry }
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// `SELECT <identity>, <columns> FROM <table> WHERE <identity> = <param>`.
    ///
    /// The identity is selected exactly once. Without `columns` every column
    /// is selected (`*`). Names are matched against the physical then the
    /// logical column names, unknown names are used verbatim.
    pub fn build_select<E: Entity>(&self, id: impl Into<Value>, columns: &[&str]) -> Result<Command> {
        let table = self.registry.resolve::<E>()?;
        let identity = table.require_identity()?;
        let mut names: Vec<&str> = Vec::with_capacity(columns.len() + 1);
        if !columns.is_empty() {
            names.push(&identity.name);
            for name in columns {
                let name = table.column(name).map(|c| &*c.name).unwrap_or(*name);
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        let mut out = String::with_capacity(128);
        out.push_str("SELECT ");
        if names.is_empty() {
            out.push('*');
        } else {
            separated_by(
                &mut out,
                names,
                |out, v| self.dialect.write_identifier_quoted(out, v),
                ", ",
            );
        }
        out.push_str(" FROM ");
        self.dialect.write_table_ref(&mut out, table.table());
        let parameter = self.write_identity_filter(&mut out, identity, id.into());
        Ok(Command::new(out, vec![parameter]))
    }

    /// `SELECT 1 FROM <table> WHERE <identity> = <param>`.
    pub fn build_exists<E: Entity>(&self, id: impl Into<Value>) -> Result<Command> {
        let table = self.registry.resolve::<E>()?;
        let identity = table.require_identity()?;
        let mut out = String::with_capacity(128);
        out.push_str("SELECT 1 FROM ");
        self.dialect.write_table_ref(&mut out, table.table());
        let parameter = self.write_identity_filter(&mut out, identity, id.into());
        Ok(Command::new(out, vec![parameter]))
    }

    /// `DELETE FROM <table> WHERE <identity> = <param>` for the current
    /// identity of `entity`.
    pub fn build_delete<E: Entity>(&self, entity: &E) -> Result<Command> {
        let table = self.registry.resolve::<E>()?;
        let identity = table.require_identity()?;
        let mut out = String::with_capacity(128);
        out.push_str("DELETE FROM ");
        self.dialect.write_table_ref(&mut out, table.table());
        let id = entity.column_value(&identity.field).unwrap_or_default();
        let parameter = self.write_identity_filter(&mut out, identity, id);
        Ok(Command::new(out, vec![parameter]))
    }

    /// `INSERT INTO <table> (<columns>) VALUES (<params>)` followed by the way
    /// the dialect reads back the generated identity.
    ///
    /// Computed, read only and identity columns are not inserted.
    pub fn build_insert<E: Entity>(&self, entity: &E) -> Result<Command> {
        let table = self.registry.resolve::<E>()?;
        let identity = table.require_identity()?;
        let columns: Vec<&ColumnDef> = table.persisted_columns().collect();
        let mut out = String::with_capacity(128 + columns.len() * 32);
        out.push_str("INSERT INTO ");
        self.dialect.write_table_ref(&mut out, table.table());
        if columns.is_empty() {
            out.push_str(" DEFAULT VALUES");
        } else {
            out.push_str(" (");
            separated_by(
                &mut out,
                columns.iter(),
                |out, c| self.dialect.write_identifier_quoted(out, &c.name),
                ", ",
            );
            out.push_str(") VALUES (");
            separated_by(
                &mut out,
                columns.iter(),
                |out, c| self.dialect.write_parameter(out, &c.name),
                ", ",
            );
            out.push(')');
        }
        let mut parameters = self.column_parameters(entity, columns);
        match self.dialect.returning {
            ReturningStyle::Clause => {
                out.push_str(" RETURNING ");
                self.dialect.write_identifier_quoted(&mut out, &identity.name);
            }
            ReturningStyle::IntoParameter => {
                out.push_str(" RETURNING ");
                self.dialect.write_identifier_quoted(&mut out, &identity.name);
                out.push_str(" INTO ");
                self.dialect.write_parameter(&mut out, &identity.name);
                let mut parameter =
                    Parameter::new(self.dialect.parameter_name(&identity.name), Value::Null)
                        .direction(ParameterDirection::Output);
                parameter.db_type = DbType::of(&identity.value);
                parameters.push(parameter);
            }
            ReturningStyle::LastInsertId => {
                if !self.dialect.last_insert_id_expression.is_empty() {
                    out.push_str("; ");
                    out.push_str(&self.dialect.last_insert_id_expression);
                }
            }
        }
        Ok(Command::new(out, parameters))
    }

    /// `UPDATE <table> SET <column> = <param>, ... WHERE <identity> = <param>`.
    ///
    /// Updates the requested columns, all the persisted ones when `columns`
    /// is empty. Requested names that are not persisted columns are ignored.
    pub fn build_update<E: Entity>(&self, entity: &E, columns: &[&str]) -> Result<Command> {
        let table = self.registry.resolve::<E>()?;
        let identity = table.require_identity()?;
        let selected: Vec<&ColumnDef> = table
            .persisted_columns()
            .filter(|c| columns.is_empty() || columns.iter().any(|n| c.is_named(n)))
            .collect();
        if selected.is_empty() {
            let error = MappingError::NoColumnsToUpdate {
                table: table.table().full_name(),
            };
            log::error!("{:#}", error);
            return Err(error.into());
        }
        let mut out = String::with_capacity(128 + selected.len() * 32);
        out.push_str("UPDATE ");
        self.dialect.write_table_ref(&mut out, table.table());
        out.push_str(" SET ");
        separated_by(
            &mut out,
            selected.iter(),
            |out, c| {
                self.dialect.write_identifier_quoted(out, &c.name);
                out.push_str(" = ");
                self.dialect.write_parameter(out, &c.name);
            },
            ", ",
        );
        let mut parameters = self.column_parameters(entity, selected);
        let id = entity.column_value(&identity.field).unwrap_or_default();
        parameters.push(self.write_identity_filter(&mut out, identity, id));
        Ok(Command::new(out, parameters))
    }

    /// Resolves the table of `E`, for callers that need more than one command.
    pub fn table<E: Entity>(&self) -> Result<std::sync::Arc<TableDef>> {
        self.registry.resolve::<E>()
    }

    fn write_identity_filter(&self, out: &mut String, identity: &ColumnDef, id: Value) -> Parameter {
        out.push_str(" WHERE ");
        self.dialect.write_identifier_quoted(out, &identity.name);
        out.push_str(" = ");
        self.dialect.write_parameter(out, &identity.name);
        Parameter::new(self.dialect.parameter_name(&identity.name), id)
    }

    fn column_parameters<'c, E: Entity>(
        &self,
        entity: &E,
        columns: impl IntoIterator<Item = &'c ColumnDef>,
    ) -> Parameters {
        columns
            .into_iter()
            .map(|c| {
                Parameter::new(
                    self.dialect.parameter_name(&c.name),
                    entity.column_value(&c.field).unwrap_or_default(),
                )
            })
            .collect()
    }
}
