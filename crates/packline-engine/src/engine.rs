use packline_ledger::LedgerAccess;
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::handlers::{assembly, balance, bootstrap, shipping, Handler, Invocation, Payload};
use crate::ids::{CaseIdSource, SeededCaseIds};
use crate::operation::Operation;

/// The handler for each operation.
///
/// Exhaustive over [`Operation`], so adding a variant without a handler is a
/// compile error.
pub fn handler_for(op: Operation) -> Handler {
    match op {
        Operation::Init => bootstrap::init,
        Operation::Transfer => balance::transfer,
        Operation::TransferDouble => balance::transfer_double,
        Operation::Delete => balance::delete,
        Operation::StartAssemblyLine => assembly::start_assembly_line,
        Operation::UpdateAssemblyStatus => assembly::update_assembly_status,
        Operation::CompleteAssemblyLine => assembly::complete_assembly_line,
        Operation::CreateShippingCase => shipping::create_shipping_case,
        Operation::GetBalance => balance::get_balance,
        Operation::GetAssemblyStatus => assembly::get_assembly_status,
        Operation::GetShippingCase => shipping::get_shipping_case,
        Operation::GetPackagingLineState => shipping::get_packaging_line_state,
    }
}

/// Runs operations against a ledger.
///
/// The engine keeps no ledger state between calls; the ledger is passed in
/// on every call. What it does own is the case id source and the clock,
/// both replaceable for deterministic tests.
pub struct TransitionEngine {
    config: EngineConfig,
    case_ids: Box<dyn CaseIdSource>,
    clock: Box<dyn Clock>,
}

impl TransitionEngine {
    /// Create an engine with the system clock and a case id source seeded
    /// from `config.case_id_seed` (or OS entropy when unset).
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let case_ids: Box<dyn CaseIdSource> = match config.case_id_seed {
            Some(seed) => Box::new(SeededCaseIds::from_seed(seed)),
            None => Box::new(SeededCaseIds::from_entropy()),
        };
        Ok(Self {
            config,
            case_ids,
            clock: Box::new(SystemClock),
        })
    }

    /// Replace the case id source.
    pub fn with_case_ids(mut self, case_ids: impl CaseIdSource + 'static) -> Self {
        self.case_ids = Box::new(case_ids);
        self
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parse an operation name and run it.
    pub fn dispatch<S: AsRef<str>>(
        &mut self,
        ledger: &dyn LedgerAccess,
        operation: &str,
        args: &[S],
    ) -> EngineResult<Payload> {
        let op: Operation = operation.parse()?;
        self.execute(ledger, op, args)
    }

    /// Run an already-parsed operation.
    pub fn execute<S: AsRef<str>>(
        &mut self,
        ledger: &dyn LedgerAccess,
        op: Operation,
        args: &[S],
    ) -> EngineResult<Payload> {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        let mut invocation = Invocation {
            ledger,
            config: &self.config,
            case_ids: self.case_ids.as_mut(),
            clock: self.clock.as_ref(),
        };

        debug!(operation = %op, kind = ?op.kind(), args = args.len(), "dispatching");
        let result = handler_for(op)(&mut invocation, &args);
        match &result {
            Ok(payload) => debug!(operation = %op, bytes = payload.len(), "operation succeeded"),
            Err(e) => warn!(operation = %op, error = %e, "operation failed"),
        }
        result
    }
}

impl std::fmt::Debug for TransitionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::testing::*;
    use packline_ledger::InMemoryLedger;

    #[test]
    fn unknown_operation_touches_nothing() {
        let ledger = initialized_ledger();
        let mut engine = test_engine();
        let before = ledger.stats();
        let err = engine.dispatch(&ledger, "mint", &["A"]).unwrap_err();
        assert!(matches!(err, EngineError::UnknownOperation(ref n) if n == "mint"));
        assert_eq!(ledger.stats(), before);
    }

    #[test]
    fn legacy_transfer_alias_routes_to_transfer() {
        let ledger = initialized_ledger();
        let mut engine = test_engine();
        engine.dispatch(&ledger, "invoke", &["a", "b", "5"]).unwrap();
        engine.dispatch(&ledger, "invoke2", &["a", "b", "5"]).unwrap();
        let a = engine.dispatch(&ledger, "getValue", &["a"]).unwrap();
        assert_eq!(a, b"85".to_vec());
    }

    #[test]
    fn reads_do_not_write() {
        let ledger = initialized_ledger();
        let mut engine = test_engine();
        engine
            .dispatch(
                &ledger,
                "startAssemblyLine",
                &["A", "S", "1", "2", "3", "4", "5", "6", "7"],
            )
            .unwrap();
        let case = engine
            .dispatch(&ledger, "createShippingCase", &["A", "Charger", "B", "Holder"])
            .unwrap();
        let case = String::from_utf8(case).unwrap();

        let before = ledger.stats().writes;
        engine.dispatch(&ledger, "getBalance", &["a"]).unwrap();
        engine.dispatch(&ledger, "getAssemblyStatus", &["A"]).unwrap();
        engine.dispatch(&ledger, "getShippingCase", &[case.as_str()]).unwrap();
        engine
            .dispatch(&ledger, "getPackagingLineState", &[case.as_str()])
            .unwrap();
        assert_eq!(ledger.stats().writes, before);
    }

    #[test]
    fn execute_accepts_owned_args() {
        let ledger = initialized_ledger();
        let mut engine = test_engine();
        let args = vec!["a".to_string()];
        let out = engine.execute(&ledger, Operation::GetBalance, &args).unwrap();
        assert_eq!(out, b"100".to_vec());
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = EngineConfig {
            max_id_attempts: 0,
            ..Default::default()
        };
        assert!(matches!(
            TransitionEngine::new(config),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn seeded_engines_allocate_identically() {
        let config = EngineConfig {
            case_id_seed: Some(7),
            ..Default::default()
        };
        let devices = ["A", "Charger", "B", "Holder"];
        let l1 = initialized_ledger();
        let l2 = initialized_ledger();
        let mut e1 = TransitionEngine::new(config.clone()).unwrap();
        let mut e2 = TransitionEngine::new(config).unwrap();
        assert_eq!(
            e1.dispatch(&l1, "createShippingCase", &devices).unwrap(),
            e2.dispatch(&l2, "createShippingCase", &devices).unwrap()
        );
    }

    #[test]
    fn every_operation_has_a_handler() {
        let ledger = InMemoryLedger::new();
        let mut engine = test_engine();
        for op in Operation::ALL {
            // Wrong arity reaches the handler and is rejected there.
            let too_many = vec!["x"; op.arity() + 1];
            let err = engine.execute(&ledger, op, &too_many).unwrap_err();
            assert!(matches!(err, EngineError::InvalidArgumentCount { .. }), "{op}");
        }
        assert_eq!(ledger.stats().writes, 0);
    }
}
