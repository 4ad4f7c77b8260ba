//! Account balance handlers: transfers, deletion, and balance reads.

use packline_records::Balance;
use packline_types::AccountId;
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};
use crate::handlers::{expect_args, parse_int, Invocation, Payload};
use crate::operation::Operation;

/// `transfer(from, to, amount)`: move `amount` from `from` to `to`.
pub fn transfer(inv: &mut Invocation<'_>, args: &[&str]) -> EngineResult<Payload> {
    move_funds(inv, Operation::Transfer, args, 1)
}

/// `transferDouble(from, to, amount)`: take `2 * amount` from `from` and
/// credit `2 * amount` to `to`.
pub fn transfer_double(inv: &mut Invocation<'_>, args: &[&str]) -> EngineResult<Payload> {
    move_funds(inv, Operation::TransferDouble, args, 2)
}

/// `delete(key)`: remove a balance. Removing an absent key succeeds.
pub fn delete(inv: &mut Invocation<'_>, args: &[&str]) -> EngineResult<Payload> {
    expect_args(Operation::Delete, args)?;
    let account = account_arg("key", args[0])?;
    inv.ledger
        .delete(account.as_str())
        .map_err(EngineError::ledger(format!("delete {account}")))?;
    info!(account = %account, "balance deleted");
    Ok(Payload::new())
}

/// `getBalance(account)`: the stored balance bytes, unmodified.
pub fn get_balance(inv: &mut Invocation<'_>, args: &[&str]) -> EngineResult<Payload> {
    expect_args(Operation::GetBalance, args)?;
    let account = account_arg("account", args[0])?;
    stored_balance(inv, &account)
}

pub(crate) fn account_arg(argument: &'static str, value: &str) -> EngineResult<AccountId> {
    AccountId::new(value).map_err(|e| EngineError::invalid_argument(argument, value, e.to_string()))
}

/// Raw bytes of an existing, non-empty balance.
fn stored_balance(inv: &Invocation<'_>, account: &AccountId) -> EngineResult<Payload> {
    let value = inv
        .ledger
        .get(account.as_str())
        .map_err(EngineError::ledger(format!("get {account}")))?
        .ok_or_else(|| EngineError::NotFound {
            entity: "balance",
            key: account.to_string(),
        })?;
    if value.is_empty() {
        return Err(EngineError::EmptyValue {
            key: account.to_string(),
        });
    }
    Ok(value)
}

/// Read an existing balance; absence is an error, never zero.
pub(crate) fn read_balance(inv: &Invocation<'_>, account: &AccountId) -> EngineResult<Balance> {
    let bytes = stored_balance(inv, account)?;
    Balance::decode(&bytes).map_err(EngineError::corrupt(format!("balance {account}")))
}

/// Write two balances, reporting `PartialWriteFailure` if only the first
/// one lands.
pub(crate) fn write_pair(
    inv: &Invocation<'_>,
    first: (&AccountId, Balance),
    second: (&AccountId, Balance),
) -> EngineResult<()> {
    let (first_account, first_balance) = first;
    let (second_account, second_balance) = second;

    inv.ledger
        .put(first_account.as_str(), &first_balance.encode())
        .map_err(EngineError::ledger(format!("put {first_account}")))?;

    if let Err(source) = inv
        .ledger
        .put(second_account.as_str(), &second_balance.encode())
    {
        warn!(
            written = %first_account,
            failed = %second_account,
            error = %source,
            "second balance write failed; ledger needs reconciliation"
        );
        return Err(EngineError::PartialWriteFailure {
            written: first_account.to_string(),
            failed: second_account.to_string(),
            source,
        });
    }
    Ok(())
}

fn move_funds(
    inv: &mut Invocation<'_>,
    op: Operation,
    args: &[&str],
    multiplier: i64,
) -> EngineResult<Payload> {
    expect_args(op, args)?;
    let from = account_arg("from", args[0])?;
    let to = account_arg("to", args[1])?;
    let amount = parse_int("amount", args[2])?;

    if from == to {
        return Err(EngineError::invalid_argument(
            "to",
            args[1],
            "source and destination must differ",
        ));
    }
    if inv.config.enforce_non_negative && amount < 0 {
        return Err(EngineError::invalid_argument(
            "amount",
            args[2],
            "must not be negative",
        ));
    }
    let delta = amount.checked_mul(multiplier).ok_or_else(|| {
        EngineError::invalid_argument("amount", args[2], "amount is out of range")
    })?;

    let from_balance = read_balance(inv, &from)?;
    let to_balance = read_balance(inv, &to)?;

    let overflow = || EngineError::invalid_argument("amount", args[2], "balance would overflow");
    let new_from = from_balance.checked_sub(delta).ok_or_else(overflow)?;
    let new_to = to_balance.checked_add(delta).ok_or_else(overflow)?;

    if inv.config.enforce_non_negative && new_from.is_negative() {
        return Err(EngineError::InsufficientBalance {
            account: from.to_string(),
            balance: from_balance.amount(),
            required: delta,
        });
    }

    write_pair(inv, (&from, new_from), (&to, new_to))?;
    info!(
        operation = %op,
        from = %from,
        to = %to,
        from_balance = new_from.amount(),
        to_balance = new_to.amount(),
        "transfer applied"
    );
    Ok(Payload::new())
}
