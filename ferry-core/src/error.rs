use thiserror::Error as ThisError;

/// Failures raised while describing entities, building commands or mapping rows.
///
/// They travel inside [`crate::Error`]; recover the kind with
/// `error.downcast_ref::<MappingError>()`.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("The table `{table}` does not have an identity column")]
    MissingIdentityColumn { table: String },
    #[error("The entity `{entity}` declares more than one identity column: {columns:?}")]
    AmbiguousIdentity {
        entity: String,
        columns: Vec<String>,
    },
    #[error("`{value}` is not a valid value for the enumeration `{enumeration}`")]
    InvalidEnumValue { enumeration: String, value: String },
    #[error("Cannot convert {value} to {target}")]
    UnconvertibleValue { value: String, target: String },
    #[error("The split boundary `{column}` cuts the row at its first column")]
    InvalidSplitBoundary { column: String },
    #[error("The result set is empty.")]
    EmptyResult,
    #[error("The result set contains more than one record.")]
    MultipleResults,
    #[error("No writable column of `{table}` matches the requested columns")]
    NoColumnsToUpdate { table: String },
}
