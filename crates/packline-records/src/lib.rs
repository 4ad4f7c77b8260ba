//! Entity codec for Packline.
//!
//! Converts domain records to and from the byte values and table rows the
//! ledger stores. Rows are decoded once, here, by column name; nothing
//! above this crate indexes a row by position.
//!
//! # Records
//!
//! - [`Balance`] -- account balance, stored as decimal text
//! - [`AssemblyRecord`] -- one assembled device and its batch lineage
//! - [`ShippingCase`] -- a packed case holding two devices

pub mod assembly;
pub mod balance;
pub mod error;
pub mod row;
pub mod shipping;

pub use assembly::{AssemblyRecord, AssemblyStatus, BatchLineage};
pub use balance::Balance;
pub use error::{CodecError, CodecResult};
pub use row::{RowReader, TableRecord};
pub use shipping::{Device, ShippingCase};
