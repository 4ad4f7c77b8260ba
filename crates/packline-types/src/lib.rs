//! Foundation types for Packline.
//!
//! This crate provides the structural types shared by the ledger boundary,
//! the entity codec, and the transition engine. Every other Packline crate
//! depends on `packline-types`.
//!
//! # Key Types
//!
//! - [`TableSchema`]: Named, fixed-column table definition with key columns
//! - [`Row`] / [`ColumnValue`]: Row values as the ledger stores them
//! - [`CaseId`]: Shipping case identifier (positive 31-bit integer)
//! - [`AccountId`]: Non-empty balance key

pub mod error;
pub mod identity;
pub mod schema;

pub use error::TypeError;
pub use identity::{AccountId, CaseId};
pub use schema::{ColumnDefinition, ColumnType, ColumnValue, Row, TableSchema};
