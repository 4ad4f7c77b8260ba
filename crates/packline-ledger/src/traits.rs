use packline_types::{ColumnValue, Row, TableSchema};

use crate::error::LedgerResult;

/// Access to the host ledger.
///
/// All implementations must satisfy these invariants:
/// - Each call is atomic on its own key or row. There are no multi-key
///   transactions; callers that touch two keys must handle the window
///   between writes themselves.
/// - Absence is `Ok(None)`; only storage or transport faults are `Err`.
/// - Calls are bounded: a backend that times out returns
///   `LedgerError::Unavailable` rather than blocking.
pub trait LedgerAccess: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> LedgerResult<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &[u8]) -> LedgerResult<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn delete(&self, key: &str) -> LedgerResult<()>;

    /// Create a table.
    ///
    /// Returns `LedgerError::TableExists` if a table with that name exists.
    fn create_table(&self, schema: &TableSchema) -> LedgerResult<()>;

    /// Insert a row.
    ///
    /// Returns `Ok(true)` if the row was inserted and `Ok(false)` if a row
    /// with the same key already exists (the existing row is untouched).
    fn insert_row(&self, table: &str, row: &Row) -> LedgerResult<bool>;

    /// Fetch the row whose key columns equal `key`.
    fn get_row(&self, table: &str, key: &[ColumnValue]) -> LedgerResult<Option<Row>>;

    /// Replace the row with the same key as `row`.
    ///
    /// Returns `Ok(false)` if no such row exists (nothing is written).
    fn replace_row(&self, table: &str, row: &Row) -> LedgerResult<bool>;
}
