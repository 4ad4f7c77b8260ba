use packline_types::TypeError;

/// Errors from encoding or decoding records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("table '{table}' has no column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("column '{column}' of table '{table}' is not a {expected}")]
    ColumnType {
        table: String,
        column: String,
        expected: &'static str,
    },

    #[error("invalid balance value: {0}")]
    InvalidBalance(String),

    #[error("invalid date '{value}' in column '{column}'")]
    InvalidDate { column: String, value: String },

    #[error("json error: {0}")]
    Json(String),

    #[error(transparent)]
    Type(#[from] TypeError),
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
