use packline_types::TypeError;

/// Errors from ledger access operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// `create_table` was called for a table that already exists.
    #[error("table already exists: {0}")]
    TableExists(String),

    /// A row operation named a table that was never created.
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// A row or key does not match the table schema.
    #[error("schema violation: {0}")]
    Schema(#[from] TypeError),

    /// The backend could not serve the request (lock poisoning, timeout,
    /// transport failure on a remote ledger).
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// A persisted snapshot could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A persisted snapshot is internally inconsistent.
    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    /// I/O error from the snapshot file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
