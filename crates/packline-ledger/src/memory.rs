use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use packline_types::{ColumnValue, Row, TableSchema};
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use crate::snapshot::{LedgerSnapshot, TableSnapshot, SNAPSHOT_VERSION};
use crate::traits::LedgerAccess;

/// Counters of calls made against an [`InMemoryLedger`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LedgerStats {
    /// `get` and `get_row` calls.
    pub reads: u64,
    /// `put`, `delete`, `create_table`, `insert_row` and `replace_row` calls.
    pub writes: u64,
}

/// In-memory ledger for tests, local runs, and embedding.
///
/// State lives in `BTreeMap`s behind a `RwLock`, so iteration order (and
/// therefore snapshot output) is deterministic.
pub struct InMemoryLedger {
    inner: RwLock<LedgerState>,
    reads: AtomicU64,
    writes: AtomicU64,
}

#[derive(Default)]
struct LedgerState {
    values: BTreeMap<String, Vec<u8>>,
    tables: BTreeMap<String, Table>,
}

struct Table {
    schema: TableSchema,
    rows: BTreeMap<Vec<ColumnValue>, Row>,
}

impl Table {
    fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            rows: BTreeMap::new(),
        }
    }
}

impl InMemoryLedger {
    /// Create a new empty ledger.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(LedgerState::default()),
            reads: AtomicU64::new(0),
            writes: AtomicU64::new(0),
        }
    }

    /// Rebuild a ledger from a snapshot, re-validating every row.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> LedgerResult<Self> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(LedgerError::CorruptSnapshot(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }

        let mut state = LedgerState {
            values: snapshot.values,
            tables: BTreeMap::new(),
        };
        for table_snapshot in snapshot.tables {
            let name = table_snapshot.schema.name.clone();
            let mut table = Table::new(table_snapshot.schema);
            for row in table_snapshot.rows {
                table.schema.validate_row(&row)?;
                let key = table.schema.key_of(&row);
                if table.rows.insert(key, row).is_some() {
                    return Err(LedgerError::CorruptSnapshot(format!(
                        "duplicate row key in table '{name}'"
                    )));
                }
            }
            if state.tables.insert(name.clone(), table).is_some() {
                return Err(LedgerError::CorruptSnapshot(format!(
                    "table '{name}' appears twice"
                )));
            }
        }

        Ok(Self {
            inner: RwLock::new(state),
            reads: AtomicU64::new(0),
            writes: AtomicU64::new(0),
        })
    }

    /// Capture the full ledger contents.
    pub fn snapshot(&self) -> LedgerResult<LedgerSnapshot> {
        let state = self.read_state()?;
        let tables = state
            .tables
            .values()
            .map(|table| TableSnapshot {
                schema: table.schema.clone(),
                rows: table.rows.values().cloned().collect(),
            })
            .collect();
        Ok(LedgerSnapshot {
            version: SNAPSHOT_VERSION,
            values: state.values.clone(),
            tables,
        })
    }

    /// Call counters since creation.
    pub fn stats(&self) -> LedgerStats {
        LedgerStats {
            reads: self.reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
        }
    }

    /// Whether a table with this name exists.
    pub fn has_table(&self, name: &str) -> bool {
        self.read_state()
            .map(|state| state.tables.contains_key(name))
            .unwrap_or(false)
    }

    /// Number of rows in a table, or `None` if the table does not exist.
    pub fn row_count(&self, table: &str) -> Option<usize> {
        self.read_state()
            .ok()
            .and_then(|state| state.tables.get(table).map(|t| t.rows.len()))
    }

    /// Sorted list of all single-value keys.
    pub fn keys(&self) -> Vec<String> {
        self.read_state()
            .map(|state| state.values.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn read_state(&self) -> LedgerResult<RwLockReadGuard<'_, LedgerState>> {
        self.inner
            .read()
            .map_err(|e| LedgerError::Unavailable(format!("lock poisoned: {e}")))
    }

    fn write_state(&self) -> LedgerResult<RwLockWriteGuard<'_, LedgerState>> {
        self.inner
            .write()
            .map_err(|e| LedgerError::Unavailable(format!("lock poisoned: {e}")))
    }

    fn count_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    fn count_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerAccess for InMemoryLedger {
    fn get(&self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        self.count_read();
        let state = self.read_state()?;
        Ok(state.values.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> LedgerResult<()> {
        self.count_write();
        let mut state = self.write_state()?;
        state.values.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> LedgerResult<()> {
        self.count_write();
        let mut state = self.write_state()?;
        state.values.remove(key);
        Ok(())
    }

    fn create_table(&self, schema: &TableSchema) -> LedgerResult<()> {
        self.count_write();
        let mut state = self.write_state()?;
        if state.tables.contains_key(&schema.name) {
            return Err(LedgerError::TableExists(schema.name.clone()));
        }
        debug!(table = %schema.name, columns = schema.columns.len(), "table created");
        state
            .tables
            .insert(schema.name.clone(), Table::new(schema.clone()));
        Ok(())
    }

    fn insert_row(&self, table: &str, row: &Row) -> LedgerResult<bool> {
        self.count_write();
        let mut state = self.write_state()?;
        let table = state
            .tables
            .get_mut(table)
            .ok_or_else(|| LedgerError::TableNotFound(table.to_string()))?;
        table.schema.validate_row(row)?;
        let key = table.schema.key_of(row);
        if table.rows.contains_key(&key) {
            return Ok(false);
        }
        table.rows.insert(key, row.clone());
        Ok(true)
    }

    fn get_row(&self, table: &str, key: &[ColumnValue]) -> LedgerResult<Option<Row>> {
        self.count_read();
        let state = self.read_state()?;
        let table = state
            .tables
            .get(table)
            .ok_or_else(|| LedgerError::TableNotFound(table.to_string()))?;
        table.schema.validate_key(key)?;
        Ok(table.rows.get(key).cloned())
    }

    fn replace_row(&self, table: &str, row: &Row) -> LedgerResult<bool> {
        self.count_write();
        let mut state = self.write_state()?;
        let table = state
            .tables
            .get_mut(table)
            .ok_or_else(|| LedgerError::TableNotFound(table.to_string()))?;
        table.schema.validate_row(row)?;
        let key = table.schema.key_of(row);
        match table.rows.get_mut(&key) {
            Some(existing) => {
                *existing = row.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl std::fmt::Debug for InMemoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (values, tables) = self
            .read_state()
            .map(|s| (s.values.len(), s.tables.len()))
            .unwrap_or_default();
        f.debug_struct("InMemoryLedger")
            .field("value_count", &values)
            .field("table_count", &tables)
            .finish()
    }
}
