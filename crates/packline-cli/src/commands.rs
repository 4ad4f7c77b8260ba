use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use packline_engine::{EngineConfig, Operation, Payload, TransitionEngine};
use packline_ledger::{InMemoryLedger, LedgerSnapshot};
use packline_records::{ShippingCase, TableRecord};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::cli::*;
use crate::config::CliConfig;

/// Result of one CLI command, before rendering.
#[derive(Debug)]
pub enum Outcome {
    Completed {
        operation: Operation,
        payload: Payload,
        persisted: bool,
    },
    Operations,
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let outcome = execute(&cli)?;
    println!("{}", render(&outcome, cli.format)?);
    Ok(())
}

pub fn execute(cli: &Cli) -> anyhow::Result<Outcome> {
    match &cli.command {
        Command::Invoke(args) => cmd_run(cli, args, false),
        Command::Query(args) => cmd_run(cli, args, true),
        Command::Operations => Ok(Outcome::Operations),
    }
}

fn cmd_run(cli: &Cli, args: &OperationArgs, read_only: bool) -> anyhow::Result<Outcome> {
    let operation: Operation = args.operation.parse()?;
    if read_only && !operation.is_read() {
        bail!("`{operation}` changes the ledger; run it with `invoke`");
    }

    let config = CliConfig::load(cli.config.as_deref())?;
    let ledger = open_ledger(&cli.state)?;
    let mut engine = TransitionEngine::new(run_config(config.engine, &ledger))?;

    let payload = engine
        .execute(&ledger, operation, &args.args)
        .with_context(|| format!("{operation} failed"))?;

    // A failed mutation never reaches the snapshot, so the file only ever
    // holds the state after whole operations.
    let persisted = !operation.is_read();
    if persisted {
        ledger
            .snapshot()?
            .save(&cli.state)
            .with_context(|| format!("saving ledger to {}", cli.state.display()))?;
        info!(operation = %operation, path = %cli.state.display(), "ledger saved");
    }

    Ok(Outcome::Completed {
        operation,
        payload,
        persisted,
    })
}

/// Each run starts a fresh engine, so a configured case id seed is mixed
/// with the number of stored cases; otherwise every run would replay the
/// same candidates and collide with the cases earlier runs created.
fn run_config(mut config: EngineConfig, ledger: &InMemoryLedger) -> EngineConfig {
    if let Some(seed) = config.case_id_seed {
        let cases = ledger.row_count(ShippingCase::TABLE).unwrap_or(0) as u64;
        config.case_id_seed = Some(seed ^ cases);
        debug!(seed, cases, "case id seed derived from ledger state");
    }
    config
}

fn open_ledger(path: &Path) -> anyhow::Result<InMemoryLedger> {
    let snapshot = LedgerSnapshot::load(path)
        .with_context(|| format!("loading ledger from {}", path.display()))?;
    match snapshot {
        Some(snapshot) => Ok(InMemoryLedger::from_snapshot(snapshot)?),
        None => {
            debug!(path = %path.display(), "no snapshot; starting from an empty ledger");
            Ok(InMemoryLedger::new())
        }
    }
}

pub fn render(outcome: &Outcome, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(outcome)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&render_json(outcome)?)?),
    }
}

fn render_text(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Completed {
            operation, payload, ..
        } if operation.is_read() => String::from_utf8_lossy(payload).into_owned(),
        Outcome::Completed {
            operation, payload, ..
        } => {
            let mut line = format!("{} {} applied", "✓".green().bold(), operation.name().bold());
            if !payload.is_empty() {
                line.push_str(&format!(": {}", String::from_utf8_lossy(payload).yellow()));
            }
            line
        }
        Outcome::Operations => Operation::ALL
            .iter()
            .map(|op| {
                let kind = if op.is_read() {
                    op.kind().as_str().cyan()
                } else {
                    op.kind().as_str().yellow()
                };
                format!("{:<24} {:<8} {} args", op.name().bold(), kind, op.arity())
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn render_json(outcome: &Outcome) -> anyhow::Result<Value> {
    let value = match outcome {
        Outcome::Completed {
            operation,
            payload,
            persisted,
        } => {
            let payload = match operation {
                Operation::GetShippingCase => serde_json::from_slice(payload)?,
                _ => Value::String(String::from_utf8_lossy(payload).into_owned()),
            };
            json!({
                "operation": operation.name(),
                "kind": operation.kind().as_str(),
                "payload": payload,
                "persisted": persisted,
            })
        }
        Outcome::Operations => Value::Array(
            Operation::ALL
                .iter()
                .map(|op| {
                    json!({
                        "name": op.name(),
                        "kind": op.kind().as_str(),
                        "arity": op.arity(),
                    })
                })
                .collect(),
        ),
    };
    Ok(value)
}
