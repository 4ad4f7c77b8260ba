use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::schema::ColumnValue;

/// Largest case identifier the ledger's 31-bit key column can hold.
pub const MAX_CASE_ID: u32 = i32::MAX as u32;

/// Identifier of a shipping case.
///
/// Case identifiers are positive and fit in a signed 32-bit integer, so a
/// case id is always in `1..=MAX_CASE_ID`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct CaseId(u32);

impl CaseId {
    /// Create a case id, rejecting zero and values beyond `MAX_CASE_ID`.
    pub fn new(value: u32) -> Result<Self, TypeError> {
        if value == 0 || value > MAX_CASE_ID {
            return Err(TypeError::InvalidIdentifier(format!(
                "case id {value} is outside 1..={MAX_CASE_ID}"
            )));
        }
        Ok(Self(value))
    }

    /// Map an arbitrary offset onto the valid id range.
    ///
    /// Offsets below `MAX_CASE_ID` map one-to-one onto `1..=MAX_CASE_ID`.
    pub fn from_offset(offset: u32) -> Self {
        Self(offset % MAX_CASE_ID + 1)
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// The key column value for this id.
    pub fn to_column(&self) -> ColumnValue {
        ColumnValue::Int(i64::from(self.0))
    }

    /// Decode from a key column value.
    pub fn from_column(value: &ColumnValue) -> Result<Self, TypeError> {
        let raw = value
            .as_int()
            .ok_or_else(|| TypeError::InvalidIdentifier(format!("case id '{value}' is not an int")))?;
        let raw = u32::try_from(raw)
            .map_err(|_| TypeError::InvalidIdentifier(format!("case id {raw} is out of range")))?;
        Self::new(raw)
    }
}

impl TryFrom<u32> for CaseId {
    type Error = TypeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CaseId> for u32 {
    fn from(id: CaseId) -> Self {
        id.0
    }
}

impl FromStr for CaseId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u32 = s
            .trim()
            .parse()
            .map_err(|_| TypeError::InvalidIdentifier(format!("'{s}' is not a case id")))?;
        Self::new(raw)
    }
}

impl fmt::Debug for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CaseId({})", self.0)
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key of an account balance in the single-key store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create an account id; blank keys are rejected.
    pub fn new(value: impl Into<String>) -> Result<Self, TypeError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(TypeError::InvalidIdentifier(
                "account id must not be empty".into(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
