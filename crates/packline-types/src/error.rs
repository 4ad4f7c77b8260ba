use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid schema for table '{table}': {reason}")]
    InvalidSchema { table: String, reason: String },

    #[error("table '{table}' expects {expected} columns, got {actual}")]
    ColumnCount {
        table: String,
        expected: usize,
        actual: usize,
    },

    #[error("column '{column}' of table '{table}' expects {expected}, got {actual}")]
    ColumnType {
        table: String,
        column: String,
        expected: String,
        actual: String,
    },

    #[error("table '{table}' has {expected} key columns, got {actual} key values")]
    KeyArity {
        table: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}
