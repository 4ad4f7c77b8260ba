use packline_ledger::LedgerError;
use packline_records::CodecError;

/// Errors returned by engine operations.
///
/// Validation variants (`InvalidArgumentCount`, `InvalidArgumentFormat`,
/// `UnknownOperation`, `InsufficientBalance`) are always raised before the
/// operation writes anything.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("{operation} expects {expected} arguments, got {actual}")]
    InvalidArgumentCount {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid {argument} '{value}': {reason}")]
    InvalidArgumentFormat {
        argument: &'static str,
        value: String,
        reason: String,
    },

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("value for '{key}' is empty")]
    EmptyValue { key: String },

    #[error("{table} already has a row with key {key}")]
    DuplicateKey { table: String, key: String },

    #[error("no unused case id found after {attempts} attempts")]
    IdentifierAllocationExhausted { attempts: u32 },

    #[error("insufficient balance in '{account}': has {balance}, needs {required}")]
    InsufficientBalance {
        account: String,
        balance: i64,
        required: i64,
    },

    /// The first of two dependent writes landed and the second did not.
    /// The ledger now needs reconciliation by the caller.
    #[error("partial write: '{written}' was updated but writing '{failed}' failed: {source}")]
    PartialWriteFailure {
        written: String,
        failed: String,
        #[source]
        source: LedgerError,
    },

    #[error("ledger access failed ({context}): {source}")]
    LedgerAccessFailure {
        context: String,
        #[source]
        source: LedgerError,
    },

    #[error("stored record is unreadable ({context}): {source}")]
    CorruptRecord {
        context: String,
        #[source]
        source: CodecError,
    },

    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    /// Wrap a ledger error with the key or table it concerned.
    pub fn ledger(context: impl Into<String>) -> impl FnOnce(LedgerError) -> Self {
        let context = context.into();
        move |source| Self::LedgerAccessFailure { context, source }
    }

    /// Wrap a codec error with the key or table it concerned.
    pub fn corrupt(context: impl Into<String>) -> impl FnOnce(CodecError) -> Self {
        let context = context.into();
        move |source| Self::CorruptRecord { context, source }
    }

    pub fn invalid_argument(
        argument: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidArgumentFormat {
            argument,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors raised before any ledger access.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnknownOperation(_)
                | Self::InvalidArgumentCount { .. }
                | Self::InvalidArgumentFormat { .. }
        )
    }
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
