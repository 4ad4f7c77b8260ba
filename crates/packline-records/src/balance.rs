use std::fmt;

use crate::error::{CodecError, CodecResult};

/// An account balance.
///
/// Stored as ASCII decimal text. Signed, because transfers without a
/// sufficient-funds check may legitimately drive a balance below zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Balance(i64);

impl Balance {
    pub const fn new(amount: i64) -> Self {
        Self(amount)
    }

    pub const fn amount(&self) -> i64 {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, amount: i64) -> Option<Self> {
        self.0.checked_add(amount).map(Self)
    }

    pub fn checked_sub(self, amount: i64) -> Option<Self> {
        self.0.checked_sub(amount).map(Self)
    }

    /// Encode as the ledger value.
    pub fn encode(&self) -> Vec<u8> {
        self.0.to_string().into_bytes()
    }

    /// Decode a ledger value.
    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|_| CodecError::InvalidBalance("value is not UTF-8".into()))?;
        text.parse::<i64>()
            .map(Self)
            .map_err(|_| CodecError::InvalidBalance(format!("'{text}' is not an integer")))
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
