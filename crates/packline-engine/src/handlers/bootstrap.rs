//! One-time ledger initialization.

use packline_ledger::LedgerError;
use packline_records::{AssemblyRecord, Balance, ShippingCase, TableRecord};
use packline_types::TableSchema;
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::handlers::balance::{account_arg, write_pair};
use crate::handlers::{expect_args, parse_int, Invocation, Payload};
use crate::operation::Operation;

/// `init(accountA, balanceA, accountB, balanceB)`: create the record tables
/// and seed two balances.
///
/// Running `init` against a ledger whose tables all exist already is a
/// no-op: the balances are left alone and the call succeeds.
pub fn init(inv: &mut Invocation<'_>, args: &[&str]) -> EngineResult<Payload> {
    expect_args(Operation::Init, args)?;
    let account_a = account_arg("accountA", args[0])?;
    let balance_a = Balance::new(parse_int("balanceA", args[1])?);
    let account_b = account_arg("accountB", args[2])?;
    let balance_b = Balance::new(parse_int("balanceB", args[3])?);

    let created_assembly = ensure_table(inv, &AssemblyRecord::schema())?;
    let created_shipping = ensure_table(inv, &ShippingCase::schema())?;
    if !created_assembly && !created_shipping {
        info!("ledger already initialized; init is a no-op");
        return Ok(Payload::new());
    }

    write_pair(inv, (&account_a, balance_a), (&account_b, balance_b))?;
    info!(
        account_a = %account_a,
        balance_a = balance_a.amount(),
        account_b = %account_b,
        balance_b = balance_b.amount(),
        "ledger initialized"
    );
    Ok(Payload::new())
}

/// Create a table, treating "already exists" as success.
///
/// Returns `true` if the table was created by this call.
fn ensure_table(inv: &Invocation<'_>, schema: &TableSchema) -> EngineResult<bool> {
    match inv.ledger.create_table(schema) {
        Ok(()) => Ok(true),
        Err(LedgerError::TableExists(_)) => {
            debug!(table = %schema.name, "table already present");
            Ok(false)
        }
        Err(e) => Err(EngineError::ledger(format!("create table {}", schema.name))(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use packline_ledger::{InMemoryLedger, LedgerAccess};

    #[test]
    fn init_creates_tables_and_balances() {
        let ledger = InMemoryLedger::new();
        let mut engine = test_engine();
        engine
            .dispatch(&ledger, "init", &["a", "100", "b", "200"])
            .unwrap();
        assert!(ledger.has_table("AssemblyLine"));
        assert!(ledger.has_table("ShippingCase"));
        assert_eq!(ledger.get("a").unwrap(), Some(b"100".to_vec()));
        assert_eq!(ledger.get("b").unwrap(), Some(b"200".to_vec()));
    }

    #[test]
    fn second_init_is_a_noop() {
        let ledger = InMemoryLedger::new();
        let mut engine = test_engine();
        engine
            .dispatch(&ledger, "init", &["a", "100", "b", "200"])
            .unwrap();
        engine.dispatch(&ledger, "transfer", &["a", "b", "10"]).unwrap();

        engine
            .dispatch(&ledger, "init", &["a", "999", "b", "999"])
            .unwrap();
        assert_eq!(ledger.get("a").unwrap(), Some(b"90".to_vec()));
        assert_eq!(ledger.get("b").unwrap(), Some(b"210".to_vec()));
    }

    #[test]
    fn init_completes_partial_schema() {
        let ledger = InMemoryLedger::new();
        ledger.create_table(&AssemblyRecord::schema()).unwrap();
        let mut engine = test_engine();
        engine
            .dispatch(&ledger, "init", &["a", "1", "b", "2"])
            .unwrap();
        assert!(ledger.has_table("ShippingCase"));
        assert_eq!(ledger.get("a").unwrap(), Some(b"1".to_vec()));
    }

    #[test]
    fn init_validates_before_touching_ledger() {
        let ledger = InMemoryLedger::new();
        let mut engine = test_engine();
        let err = engine
            .dispatch(&ledger, "init", &["a", "100", "b", "lots"])
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidArgumentFormat { argument: "balanceB", .. }
        ));
        assert_eq!(ledger.stats().writes, 0);
        assert!(!ledger.has_table("AssemblyLine"));
    }

    #[test]
    fn init_requires_four_args() {
        let ledger = InMemoryLedger::new();
        let mut engine = test_engine();
        let err = engine.dispatch(&ledger, "init", &["a", "1"]).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidArgumentCount { expected: 4, actual: 2, .. }
        ));
    }

    #[test]
    fn init_surfaces_storage_faults() {
        let ledger = FaultyLedger::new(InMemoryLedger::new());
        ledger.fail_table_creation();
        let mut engine = test_engine();
        let err = engine
            .dispatch(&ledger, "init", &["a", "1", "b", "2"])
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::LedgerAccessFailure { ref context, .. } if context == "create table AssemblyLine"
        ));
    }
}
