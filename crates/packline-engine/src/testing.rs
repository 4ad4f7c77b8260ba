//! Shared fixtures for the engine's unit tests.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::NaiveDate;
use packline_ledger::{InMemoryLedger, LedgerAccess, LedgerError, LedgerResult};
use packline_records::{AssemblyRecord, ShippingCase, TableRecord};
use packline_types::{CaseId, ColumnValue, Row, TableSchema};

use crate::clock::FixedClock;
use crate::config::EngineConfig;
use crate::engine::TransitionEngine;
use crate::ids::{CaseIdSource, SeededCaseIds};

pub const TEST_SEED: u64 = 0x5eed;

pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

fn engine_with(config: EngineConfig) -> TransitionEngine {
    TransitionEngine::new(config)
        .unwrap()
        .with_case_ids(SeededCaseIds::from_seed(TEST_SEED))
        .with_clock(FixedClock(test_date()))
}

/// Baseline engine with a seeded id source and a fixed clock.
pub fn test_engine() -> TransitionEngine {
    engine_with(EngineConfig::default())
}

/// Same as [`test_engine`] with non-negative balances enforced.
pub fn hardened_engine() -> TransitionEngine {
    engine_with(EngineConfig::hardened())
}

/// Engine whose case id source yields exactly `ids`, in order.
pub fn scripted_engine(ids: &[u32]) -> TransitionEngine {
    test_engine().with_case_ids(ScriptedCaseIds(
        ids.iter().map(|&n| CaseId::new(n).unwrap()).collect(),
    ))
}

struct ScriptedCaseIds(VecDeque<CaseId>);

impl CaseIdSource for ScriptedCaseIds {
    fn next_candidate(&mut self) -> CaseId {
        self.0.pop_front().expect("scripted case ids exhausted")
    }
}

/// Both record tables plus balances `a = 100` and `b = 200`.
pub fn initialized_ledger() -> InMemoryLedger {
    let ledger = InMemoryLedger::new();
    ledger.create_table(&AssemblyRecord::schema()).unwrap();
    ledger.create_table(&ShippingCase::schema()).unwrap();
    ledger.put("a", b"100").unwrap();
    ledger.put("b", b"200").unwrap();
    ledger
}

/// Wraps an [`InMemoryLedger`] and injects faults on request.
pub struct FaultyLedger {
    inner: InMemoryLedger,
    failing_puts: Mutex<HashSet<String>>,
    hide_rows: AtomicBool,
    fail_tables: AtomicBool,
}

impl FaultyLedger {
    pub fn new(inner: InMemoryLedger) -> Self {
        Self {
            inner,
            failing_puts: Mutex::new(HashSet::new()),
            hide_rows: AtomicBool::new(false),
            fail_tables: AtomicBool::new(false),
        }
    }

    /// Every `put` to `key` fails with `Unavailable`.
    pub fn fail_puts_to(&self, key: &str) {
        self.failing_puts.lock().unwrap().insert(key.to_string());
    }

    /// `get_row` reports every row as absent.
    pub fn hide_rows(&self) {
        self.hide_rows.store(true, Ordering::SeqCst);
    }

    /// `create_table` fails with `Unavailable`.
    pub fn fail_table_creation(&self) {
        self.fail_tables.store(true, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &InMemoryLedger {
        &self.inner
    }
}

impl LedgerAccess for FaultyLedger {
    fn get(&self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> LedgerResult<()> {
        if self.failing_puts.lock().unwrap().contains(key) {
            return Err(LedgerError::Unavailable(format!("injected put fault on {key}")));
        }
        self.inner.put(key, value)
    }

    fn delete(&self, key: &str) -> LedgerResult<()> {
        self.inner.delete(key)
    }

    fn create_table(&self, schema: &TableSchema) -> LedgerResult<()> {
        if self.fail_tables.load(Ordering::SeqCst) {
            return Err(LedgerError::Unavailable("injected table fault".into()));
        }
        self.inner.create_table(schema)
    }

    fn insert_row(&self, table: &str, row: &Row) -> LedgerResult<bool> {
        self.inner.insert_row(table, row)
    }

    fn get_row(&self, table: &str, key: &[ColumnValue]) -> LedgerResult<Option<Row>> {
        if self.hide_rows.load(Ordering::SeqCst) {
            return Ok(None);
        }
        self.inner.get_row(table, key)
    }

    fn replace_row(&self, table: &str, row: &Row) -> LedgerResult<bool> {
        self.inner.replace_row(table, row)
    }
}
