//! Shipping case handlers.

use packline_records::{Device, ShippingCase};
use packline_types::CaseId;
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::handlers::{expect_args, fetch_record, insert_record, record_exists, Invocation, Payload};
use crate::operation::Operation;

const ENTITY: &str = "shipping case";

/// `createShippingCase(primaryId, primaryType, secondaryId, secondaryType)`:
/// pack two devices into a case under a freshly allocated id. Returns the
/// case id as decimal text.
pub fn create_shipping_case(inv: &mut Invocation<'_>, args: &[&str]) -> EngineResult<Payload> {
    expect_args(Operation::CreateShippingCase, args)?;
    let primary = Device::new(args[0], args[1]);
    let secondary = Device::new(args[2], args[3]);

    let case_id = allocate_case_id(inv)?;
    let case = ShippingCase::packed(case_id, primary, secondary, inv.clock.today());
    insert_record(inv.ledger, &case)?;

    info!(
        case = %case_id,
        primary = %case.primary_device_id,
        secondary = %case.secondary_device_id,
        "shipping case created"
    );
    Ok(case_id.to_string().into_bytes())
}

/// `getShippingCase(caseId)`: the full case as JSON.
pub fn get_shipping_case(inv: &mut Invocation<'_>, args: &[&str]) -> EngineResult<Payload> {
    expect_args(Operation::GetShippingCase, args)?;
    let case = load_case(inv, args[0])?;
    case.to_json()
        .map_err(EngineError::corrupt(format!("shipping case {}", case.case_id)))
}

/// `getPackagingLineState(caseId)`: the packaging line state only.
pub fn get_packaging_line_state(
    inv: &mut Invocation<'_>,
    args: &[&str],
) -> EngineResult<Payload> {
    expect_args(Operation::GetPackagingLineState, args)?;
    let case = load_case(inv, args[0])?;
    Ok(case.packaging_line_state.into_bytes())
}

/// Draw candidates until one has no row in the case table.
///
/// Uniqueness is checked against the table itself, not assumed from the
/// randomness of the source.
fn allocate_case_id(inv: &mut Invocation<'_>) -> EngineResult<CaseId> {
    let attempts = inv.config.max_id_attempts;
    for attempt in 1..=attempts {
        let candidate = inv.case_ids.next_candidate();
        if !record_exists::<ShippingCase>(inv.ledger, &ShippingCase::key_for(candidate))? {
            debug!(case = %candidate, attempt, "case id allocated");
            return Ok(candidate);
        }
        warn!(case = %candidate, attempt, "case id collision; drawing again");
    }
    Err(EngineError::IdentifierAllocationExhausted { attempts })
}

fn load_case(inv: &Invocation<'_>, raw_id: &str) -> EngineResult<ShippingCase> {
    let case_id: CaseId = raw_id
        .parse()
        .map_err(|e: packline_types::TypeError| {
            EngineError::invalid_argument("caseId", raw_id, e.to_string())
        })?;
    fetch_record(inv.ledger, ENTITY, &ShippingCase::key_for(case_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::CaseIdSource;
    use crate::testing::*;
    use packline_ledger::{InMemoryLedger, LedgerAccess};
    use packline_records::TableRecord;
    use std::collections::HashSet;

    const DEVICES: [&str; 4] = ["A-1", "Charger", "A-2", "Holder"];

    fn case_id(n: u32) -> CaseId {
        CaseId::new(n).unwrap()
    }

    fn seed_case(ledger: &InMemoryLedger, id: u32) {
        let case = ShippingCase::packed(
            case_id(id),
            Device::new("x", "Charger"),
            Device::new("y", "Holder"),
            test_date(),
        );
        ledger
            .insert_row(ShippingCase::TABLE, &case.to_row())
            .unwrap();
    }

    #[test]
    fn create_returns_id_and_stores_case() {
        let ledger = initialized_ledger();
        let mut engine = scripted_engine(&[41]);
        let out = engine
            .dispatch(&ledger, "createShippingCase", &DEVICES)
            .unwrap();
        assert_eq!(out, b"41".to_vec());

        let json = engine.dispatch(&ledger, "getShippingCase", &["41"]).unwrap();
        let case = ShippingCase::from_json(&json).unwrap();
        assert_eq!(case.primary_device_type, "Charger");
        assert_eq!(case.secondary_device_id, "A-2");
        assert_eq!(case.packaging_date, test_date());
        assert_eq!(case.test_date, test_date());
        assert_eq!(case.test_result, "Within Range");
        assert_eq!(case.packaging_line_state, "QA");
    }

    #[test]
    fn sequential_creates_yield_distinct_ids() {
        let ledger = initialized_ledger();
        let mut engine = test_engine();
        let ids: HashSet<Vec<u8>> = (0..25)
            .map(|_| engine.dispatch(&ledger, "createShippingCase", &DEVICES).unwrap())
            .collect();
        assert_eq!(ids.len(), 25);
        assert_eq!(ledger.row_count(ShippingCase::TABLE), Some(25));
    }

    #[test]
    fn collision_triggers_one_retry() {
        let ledger = initialized_ledger();
        seed_case(&ledger, 7);
        let mut engine = scripted_engine(&[7, 8]);
        let out = engine
            .dispatch(&ledger, "createShippingCase", &DEVICES)
            .unwrap();
        assert_eq!(out, b"8".to_vec());
        assert_eq!(ledger.row_count(ShippingCase::TABLE), Some(2));
    }

    #[test]
    fn collisions_beyond_bound_exhaust() {
        let ledger = initialized_ledger();
        seed_case(&ledger, 7);
        let mut engine = scripted_engine(&[7; 8]);
        let before = ledger.stats().writes;
        let err = engine
            .dispatch(&ledger, "createShippingCase", &DEVICES)
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::IdentifierAllocationExhausted { attempts: 8 }
        ));
        assert_eq!(ledger.stats().writes, before);
    }

    #[test]
    fn seeded_source_collision_is_retried() {
        let mut probe = crate::ids::SeededCaseIds::from_seed(TEST_SEED);
        let first = probe.next_candidate();

        let ledger = initialized_ledger();
        seed_case(&ledger, first.get());
        let mut engine = test_engine();
        let out = engine
            .dispatch(&ledger, "createShippingCase", &DEVICES)
            .unwrap();
        assert_ne!(out, first.to_string().into_bytes());
        assert_eq!(out, probe.next_candidate().to_string().into_bytes());
    }

    #[test]
    fn create_with_wrong_arity_writes_nothing() {
        let ledger = initialized_ledger();
        let mut engine = test_engine();
        let before = ledger.stats();
        let err = engine
            .dispatch(&ledger, "createShippingCase", &DEVICES[..3])
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(ledger.stats(), before);
    }

    #[test]
    fn insert_conflict_after_probe_is_duplicate_key() {
        let ledger = FaultyLedger::new(initialized_ledger());
        ledger.hide_rows();
        seed_case(ledger.inner(), 5);
        let mut engine = scripted_engine(&[5]);
        let err = engine
            .dispatch(&ledger, "createShippingCase", &DEVICES)
            .unwrap_err();
        assert!(matches!(err, EngineError::DuplicateKey { ref key, .. } if key == "5"));
    }

    #[test]
    fn get_unknown_case_is_not_found() {
        let ledger = initialized_ledger();
        let mut engine = test_engine();
        let err = engine
            .dispatch(&ledger, "getShippingCase", &["12345"])
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound { entity: "shipping case", .. }));
    }

    #[test]
    fn get_case_rejects_non_numeric_id() {
        let ledger = initialized_ledger();
        let mut engine = test_engine();
        let err = engine
            .dispatch(&ledger, "getShippingCase", &["abc"])
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgumentFormat { argument: "caseId", .. }));
    }

    #[test]
    fn legacy_get_case_alias() {
        let ledger = initialized_ledger();
        seed_case(&ledger, 3);
        let mut engine = test_engine();
        let json = engine.dispatch(&ledger, "getCaseID", &["3"]).unwrap();
        assert_eq!(ShippingCase::from_json(&json).unwrap().case_id, case_id(3));
    }

    #[test]
    fn packaging_line_state_only() {
        let ledger = initialized_ledger();
        seed_case(&ledger, 9);
        let mut engine = test_engine();
        let out = engine
            .dispatch(&ledger, "getPackagingLineState", &["9"])
            .unwrap();
        assert_eq!(out, b"QA".to_vec());
    }
}
