use crate::TableRef;
use std::borrow::Cow;

/// Position of the catalog in a qualified table name.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CatalogLocation {
    /// `catalog.schema.table`
    #[default]
    Start,
    /// `schema.table@catalog`
    End,
}

/// How the generated identity of an inserted row is read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturningStyle {
    /// `RETURNING <identity>` ends the insert and yields a row.
    Clause,
    /// `RETURNING <identity> INTO <parameter>` fills an output parameter.
    IntoParameter,
    /// A second statement evaluates the last insert id expression.
    LastInsertId,
}

/// Identifier quoting, parameter style and returning conventions of an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    pub quote_prefix: Cow<'static, str>,
    pub quote_suffix: Cow<'static, str>,
    pub parameter_prefix: Cow<'static, str>,
    pub catalog_separator: Cow<'static, str>,
    pub catalog_location: CatalogLocation,
    pub schema_separator: Cow<'static, str>,
    /// Placeholders are the anonymous `?`, bound by position.
    pub positional_parameters: bool,
    pub returning: ReturningStyle,
    /// Expression returning the identity of the last inserted row, empty when
    /// the engine has none.
    pub last_insert_id_expression: Cow<'static, str>,
}

impl Default for Dialect {
    /// Bracket quotes and `@` parameters, the SQL Server conventions.
    fn default() -> Self {
        Self {
            quote_prefix: "[".into(),
            quote_suffix: "]".into(),
            parameter_prefix: "@".into(),
            catalog_separator: ".".into(),
            catalog_location: CatalogLocation::Start,
            schema_separator: ".".into(),
            positional_parameters: false,
            returning: ReturningStyle::LastInsertId,
            last_insert_id_expression: "SELECT SCOPE_IDENTITY()".into(),
        }
    }
}

impl Dialect {
    /// Conventions of the engine identified by `driver`, case insensitive.
    ///
    /// Unknown drivers get [`Dialect::default`].
    pub fn for_driver(driver: &str) -> Self {
        let double_quotes = Self {
            quote_prefix: "\"".into(),
            quote_suffix: "\"".into(),
            returning: ReturningStyle::Clause,
            last_insert_id_expression: "".into(),
            ..Default::default()
        };
        match driver.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Self {
                quote_prefix: "`".into(),
                quote_suffix: "`".into(),
                last_insert_id_expression: "SELECT LAST_INSERT_ID()".into(),
                ..Default::default()
            },
            "sqlite" => Self {
                last_insert_id_expression: "SELECT last_insert_rowid()".into(),
                ..double_quotes
            },
            "postgres" | "postgresql" => Self {
                last_insert_id_expression: "SELECT lastval()".into(),
                ..double_quotes
            },
            "firebird" => double_quotes,
            "duckdb" => Self {
                parameter_prefix: "$".into(),
                ..double_quotes
            },
            "oracle" => Self {
                parameter_prefix: ":".into(),
                catalog_separator: "@".into(),
                catalog_location: CatalogLocation::End,
                returning: ReturningStyle::IntoParameter,
                ..double_quotes
            },
            "odbc" | "oledb" => Self {
                positional_parameters: true,
                last_insert_id_expression: "SELECT @@IDENTITY".into(),
                ..Default::default()
            },
            _ => Default::default(),
        }
    }

    pub fn supports_returning_clause(&self) -> bool {
        self.returning != ReturningStyle::LastInsertId
    }

    /// Wraps `identifier` in the quote prefix and suffix, doubling every
    /// embedded suffix.
    pub fn quote(&self, identifier: &str) -> String {
        let mut out = String::with_capacity(identifier.len() + 2);
        self.write_identifier_quoted(&mut out, identifier);
        out
    }

    /// Reverse of [`Dialect::quote`]: strips a leading prefix and a trailing
    /// suffix, each one when present, then collapses the doubled suffixes.
    pub fn unquote(&self, identifier: &str) -> String {
        let (prefix, suffix) = (self.quote_prefix.as_ref(), self.quote_suffix.as_ref());
        let identifier = identifier.strip_prefix(prefix).unwrap_or(identifier);
        let identifier = identifier.strip_suffix(suffix).unwrap_or(identifier);
        if suffix.is_empty() {
            return identifier.to_string();
        }
        identifier.replace(&format!("{suffix}{suffix}"), suffix)
    }

    /// `name` with the parameter prefix, left unchanged when already prefixed.
    pub fn parameter_name(&self, name: &str) -> String {
        if name.starts_with(self.parameter_prefix.as_ref()) {
            name.to_string()
        } else {
            format!("{}{}", self.parameter_prefix, name)
        }
    }

    pub fn write_escaped(&self, out: &mut String, value: &str, search: &str, replace: &str) {
        if search.is_empty() {
            out.push_str(value);
            return;
        }
        let mut position = 0;
        for (i, _) in value.match_indices(search) {
            out.push_str(&value[position..i]);
            out.push_str(replace);
            position = i + search.len();
        }
        out.push_str(&value[position..]);
    }

    pub fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        let suffix = self.quote_suffix.as_ref();
        out.push_str(&self.quote_prefix);
        self.write_escaped(out, value, suffix, &format!("{suffix}{suffix}"));
        out.push_str(suffix);
    }

    /// Writes the qualified table name, skipping the empty parts.
    pub fn write_table_ref(&self, out: &mut String, value: &TableRef) {
        let has_catalog = !value.catalog.is_empty();
        if has_catalog && self.catalog_location == CatalogLocation::Start {
            self.write_identifier_quoted(out, &value.catalog);
            out.push_str(&self.catalog_separator);
        }
        if !value.schema.is_empty() {
            self.write_identifier_quoted(out, &value.schema);
            out.push_str(&self.schema_separator);
        }
        self.write_identifier_quoted(out, &value.name);
        if has_catalog && self.catalog_location == CatalogLocation::End {
            out.push_str(&self.catalog_separator);
            self.write_identifier_quoted(out, &value.catalog);
        }
    }

    /// Writes the placeholder for the parameter bound to `column`.
    pub fn write_parameter(&self, out: &mut String, column: &str) {
        if self.positional_parameters {
            out.push('?');
        } else {
            out.push_str(&self.parameter_prefix);
            out.push_str(column);
        }
    }
}
