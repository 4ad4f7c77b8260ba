//! State-transition engine for Packline.
//!
//! The engine is invoked with an operation name and positional text
//! arguments. It validates them, reads the prior state it needs from the
//! ledger, computes the new state, writes it back, and returns a byte
//! payload. Every failure is a typed [`EngineError`].
//!
//! # Quick Start
//!
//! ```rust
//! use packline_engine::{EngineConfig, TransitionEngine};
//! use packline_ledger::InMemoryLedger;
//!
//! let ledger = InMemoryLedger::new();
//! let mut engine = TransitionEngine::new(EngineConfig::default()).unwrap();
//! engine.dispatch(&ledger, "init", &["alice", "100", "bob", "50"]).unwrap();
//! engine.dispatch(&ledger, "transfer", &["alice", "bob", "30"]).unwrap();
//! let balance = engine.dispatch(&ledger, "getBalance", &["bob"]).unwrap();
//! assert_eq!(balance, b"80");
//! ```
//!
//! # Balance modes
//!
//! By default balances may go negative. With
//! [`EngineConfig::enforce_non_negative`] set, transfers that would overdraw
//! the source account are rejected before anything is written.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod ids;
pub mod operation;

#[cfg(test)]
mod testing;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::EngineConfig;
pub use engine::{handler_for, TransitionEngine};
pub use error::{EngineError, EngineResult};
pub use handlers::{Handler, Invocation, Payload};
pub use ids::{CaseIdSource, SeededCaseIds};
pub use operation::{Operation, OperationKind};
