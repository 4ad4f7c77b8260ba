use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "packline",
    about = "Packline: assembly, packaging, and shipping ledger",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Ledger snapshot file; created on the first successful mutation.
    #[arg(long, global = true, default_value = "packline-ledger.json")]
    pub state: PathBuf,

    /// TOML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run any operation and persist the resulting state
    Invoke(OperationArgs),
    /// Run a read-only operation
    Query(OperationArgs),
    /// List supported operations
    Operations,
}

#[derive(Args)]
pub struct OperationArgs {
    /// Operation name, e.g. `transfer` or `getShippingCase`
    pub operation: String,
    /// Positional operation arguments
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}
