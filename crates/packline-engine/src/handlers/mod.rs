//! Operation handlers.
//!
//! Each handler validates its arguments, reads the prior state it needs,
//! computes the new state, and writes it back. Handlers share the
//! [`Invocation`] context and the helpers below; they never hold state
//! between calls.

pub mod assembly;
pub mod balance;
pub mod bootstrap;
pub mod shipping;

use packline_ledger::LedgerAccess;
use packline_records::TableRecord;
use packline_types::ColumnValue;

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::ids::CaseIdSource;
use crate::operation::Operation;

/// Bytes returned to the caller on success.
pub type Payload = Vec<u8>;

/// Signature shared by every handler.
pub type Handler = fn(&mut Invocation<'_>, &[&str]) -> EngineResult<Payload>;

/// Everything a handler may touch during one call.
pub struct Invocation<'a> {
    pub ledger: &'a dyn LedgerAccess,
    pub config: &'a EngineConfig,
    pub case_ids: &'a mut dyn CaseIdSource,
    pub clock: &'a dyn Clock,
}

/// Fail with `InvalidArgumentCount` unless exactly `op.arity()` args were given.
pub(crate) fn expect_args(op: Operation, args: &[&str]) -> EngineResult<()> {
    if args.len() != op.arity() {
        return Err(EngineError::InvalidArgumentCount {
            operation: op.name(),
            expected: op.arity(),
            actual: args.len(),
        });
    }
    Ok(())
}

pub(crate) fn parse_int(argument: &'static str, value: &str) -> EngineResult<i64> {
    value
        .parse::<i64>()
        .map_err(|_| EngineError::invalid_argument(argument, value, "expected an integer"))
}

pub(crate) fn non_empty<'v>(argument: &'static str, value: &'v str) -> EngineResult<&'v str> {
    if value.trim().is_empty() {
        return Err(EngineError::invalid_argument(argument, value, "must not be empty"));
    }
    Ok(value)
}

fn display_key(key: &[ColumnValue]) -> String {
    key.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("/")
}

/// Insert a new record, mapping "row already exists" to `DuplicateKey`.
pub(crate) fn insert_record<R: TableRecord>(
    ledger: &dyn LedgerAccess,
    record: &R,
) -> EngineResult<()> {
    let key = display_key(&record.key());
    let inserted = ledger
        .insert_row(R::TABLE, &record.to_row())
        .map_err(EngineError::ledger(format!("insert {} {key}", R::TABLE)))?;
    if !inserted {
        return Err(EngineError::DuplicateKey {
            table: R::TABLE.to_string(),
            key,
        });
    }
    Ok(())
}

/// Fetch and decode a record, mapping absence to `NotFound`.
pub(crate) fn fetch_record<R: TableRecord>(
    ledger: &dyn LedgerAccess,
    entity: &'static str,
    key: &[ColumnValue],
) -> EngineResult<R> {
    let label = display_key(key);
    let row = ledger
        .get_row(R::TABLE, key)
        .map_err(EngineError::ledger(format!("get {} {label}", R::TABLE)))?
        .ok_or_else(|| EngineError::NotFound {
            entity,
            key: label.clone(),
        })?;
    R::from_row(&row).map_err(EngineError::corrupt(format!("{} {label}", R::TABLE)))
}

/// Whether a row exists under `key`.
pub(crate) fn record_exists<R: TableRecord>(
    ledger: &dyn LedgerAccess,
    key: &[ColumnValue],
) -> EngineResult<bool> {
    let found = ledger
        .get_row(R::TABLE, key)
        .map_err(EngineError::ledger(format!("get {} {}", R::TABLE, display_key(key))))?;
    Ok(found.is_some())
}

/// Overwrite an existing record, mapping "no such row" to `NotFound`.
pub(crate) fn replace_record<R: TableRecord>(
    ledger: &dyn LedgerAccess,
    entity: &'static str,
    record: &R,
) -> EngineResult<()> {
    let key = display_key(&record.key());
    let replaced = ledger
        .replace_row(R::TABLE, &record.to_row())
        .map_err(EngineError::ledger(format!("replace {} {key}", R::TABLE)))?;
    if !replaced {
        return Err(EngineError::NotFound { entity, key });
    }
    Ok(())
}
