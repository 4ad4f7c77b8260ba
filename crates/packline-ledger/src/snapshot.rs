//! JSON snapshots of an [`InMemoryLedger`](crate::InMemoryLedger).
//!
//! The CLI keeps ledger state between runs by loading a snapshot at start
//! and saving it after a successful mutation. Saves go through a temporary
//! file in the same directory followed by a rename, so a crash mid-write
//! leaves the previous snapshot intact.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use packline_types::{Row, TableSchema};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};

/// Current on-disk snapshot format.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable image of a ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: u32,
    pub values: BTreeMap<String, Vec<u8>>,
    pub tables: Vec<TableSnapshot>,
}

/// One table: its schema and rows in key order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub schema: TableSchema,
    pub rows: Vec<Row>,
}

impl LedgerSnapshot {
    /// Load a snapshot file. Returns `Ok(None)` if the file does not exist.
    pub fn load(path: &Path) -> LedgerResult<Option<Self>> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let snapshot: Self = serde_json::from_slice(&bytes)
            .map_err(|e| LedgerError::Serialization(e.to_string()))?;
        debug!(path = %path.display(), tables = snapshot.tables.len(), "snapshot loaded");
        Ok(Some(snapshot))
    }

    /// Atomically replace the snapshot file at `path`.
    pub fn save(&self, path: &Path) -> LedgerResult<()> {
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| LedgerError::Serialization(e.to_string()))?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        debug!(path = %path.display(), bytes = json.len(), "snapshot saved");
        Ok(())
    }
}
