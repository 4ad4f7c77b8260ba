//! Ledger access boundary for Packline.
//!
//! The host platform owns consensus, replication, and physical storage.
//! Packline only ever talks to it through the narrow [`LedgerAccess`]
//! trait: single-key get/put/delete plus keyed tables.
//!
//! # Backends
//!
//! - [`InMemoryLedger`] -- `BTreeMap`-based ledger for tests, local runs,
//!   and embedding. It can be saved to and restored from a
//!   [`LedgerSnapshot`] JSON file.
//!
//! # Design Rules
//!
//! 1. Single-key and single-row operations are atomic; nothing wider is.
//! 2. Inserting an existing row key is not an error: `insert_row` returns
//!    `Ok(false)` and leaves the row untouched.
//! 3. A missing row or key is `Ok(None)`, never an error.
//! 4. Storage faults are propagated, never silently ignored.

pub mod error;
pub mod memory;
pub mod snapshot;
pub mod traits;

pub use error::{LedgerError, LedgerResult};
pub use memory::{InMemoryLedger, LedgerStats};
pub use snapshot::{LedgerSnapshot, TableSnapshot};
pub use traits::LedgerAccess;
