//! Assembly line handlers.

use packline_records::{AssemblyRecord, AssemblyStatus, BatchLineage};
use tracing::info;

use crate::error::EngineResult;
use crate::handlers::{
    expect_args, fetch_record, insert_record, non_empty, replace_record, Invocation, Payload,
};
use crate::operation::Operation;

const ENTITY: &str = "assembly";

/// `startAssemblyLine(assemblyId, serialId, batch ids...)`: record a new
/// assembly with status `InProgress`.
pub fn start_assembly_line(inv: &mut Invocation<'_>, args: &[&str]) -> EngineResult<Payload> {
    expect_args(Operation::StartAssemblyLine, args)?;
    let assembly_id = non_empty("assemblyId", args[0])?;
    let serial_id = args[1];

    let mut batches: [String; BatchLineage::LEN] = Default::default();
    for (slot, value) in batches.iter_mut().zip(&args[2..]) {
        *slot = (*value).to_string();
    }

    let record = AssemblyRecord::started(
        assembly_id.to_string(),
        serial_id.to_string(),
        BatchLineage::from_ordered(batches),
    );
    insert_record(inv.ledger, &record)?;
    info!(assembly = %record.assembly_id, serial = %record.serial_id, "assembly started");
    Ok(Payload::new())
}

/// `updateAssemblyStatus(assemblyId, status)`: change only the status.
pub fn update_assembly_status(inv: &mut Invocation<'_>, args: &[&str]) -> EngineResult<Payload> {
    expect_args(Operation::UpdateAssemblyStatus, args)?;
    let status = non_empty("status", args[1])?;
    set_status(inv, args[0], status.to_string().into())
}

/// `completeAssemblyLine(assemblyId)`: mark the assembly `Completed`.
pub fn complete_assembly_line(inv: &mut Invocation<'_>, args: &[&str]) -> EngineResult<Payload> {
    expect_args(Operation::CompleteAssemblyLine, args)?;
    set_status(inv, args[0], AssemblyStatus::Completed)
}

/// `getAssemblyStatus(assemblyId)`: the status string only, so callers
/// that need progress never see batch lineage.
pub fn get_assembly_status(inv: &mut Invocation<'_>, args: &[&str]) -> EngineResult<Payload> {
    expect_args(Operation::GetAssemblyStatus, args)?;
    let record: AssemblyRecord =
        fetch_record(inv.ledger, ENTITY, &AssemblyRecord::key_for(args[0]))?;
    Ok(record.assembly_status.as_str().as_bytes().to_vec())
}

fn set_status(
    inv: &mut Invocation<'_>,
    assembly_id: &str,
    status: AssemblyStatus,
) -> EngineResult<Payload> {
    let assembly_id = non_empty("assemblyId", assembly_id)?;
    let mut record: AssemblyRecord =
        fetch_record(inv.ledger, ENTITY, &AssemblyRecord::key_for(assembly_id))?;
    let previous = std::mem::replace(&mut record.assembly_status, status);
    replace_record(inv.ledger, ENTITY, &record)?;
    info!(
        assembly = %record.assembly_id,
        from = %previous,
        to = %record.assembly_status,
        "assembly status changed"
    );
    Ok(Payload::new())
}
