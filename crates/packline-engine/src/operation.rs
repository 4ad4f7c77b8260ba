use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// Whether an operation changes ledger state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Mutation,
    Read,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mutation => "mutation",
            Self::Read => "read",
        }
    }
}

/// Every operation the engine can run.
///
/// Names arriving from callers are parsed into this enum at the boundary;
/// unknown names never reach a handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Init,
    Transfer,
    TransferDouble,
    Delete,
    StartAssemblyLine,
    UpdateAssemblyStatus,
    CompleteAssemblyLine,
    CreateShippingCase,
    GetBalance,
    GetAssemblyStatus,
    GetShippingCase,
    GetPackagingLineState,
}

impl Operation {
    /// All operations, mutations first.
    pub const ALL: [Operation; 12] = [
        Self::Init,
        Self::Transfer,
        Self::TransferDouble,
        Self::Delete,
        Self::StartAssemblyLine,
        Self::UpdateAssemblyStatus,
        Self::CompleteAssemblyLine,
        Self::CreateShippingCase,
        Self::GetBalance,
        Self::GetAssemblyStatus,
        Self::GetShippingCase,
        Self::GetPackagingLineState,
    ];

    /// Canonical wire name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Transfer => "transfer",
            Self::TransferDouble => "transferDouble",
            Self::Delete => "delete",
            Self::StartAssemblyLine => "startAssemblyLine",
            Self::UpdateAssemblyStatus => "updateAssemblyStatus",
            Self::CompleteAssemblyLine => "completeAssemblyLine",
            Self::CreateShippingCase => "createShippingCase",
            Self::GetBalance => "getBalance",
            Self::GetAssemblyStatus => "getAssemblyStatus",
            Self::GetShippingCase => "getShippingCase",
            Self::GetPackagingLineState => "getPackagingLineState",
        }
    }

    /// Exact number of arguments the operation takes.
    pub fn arity(&self) -> usize {
        match self {
            Self::Init => 4,
            Self::Transfer | Self::TransferDouble => 3,
            Self::Delete => 1,
            Self::StartAssemblyLine => 9,
            Self::UpdateAssemblyStatus => 2,
            Self::CompleteAssemblyLine => 1,
            Self::CreateShippingCase => 4,
            Self::GetBalance
            | Self::GetAssemblyStatus
            | Self::GetShippingCase
            | Self::GetPackagingLineState => 1,
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Self::GetBalance
            | Self::GetAssemblyStatus
            | Self::GetShippingCase
            | Self::GetPackagingLineState => OperationKind::Read,
            _ => OperationKind::Mutation,
        }
    }

    pub fn is_read(&self) -> bool {
        self.kind() == OperationKind::Read
    }
}

impl FromStr for Operation {
    type Err = EngineError;

    /// Parse a wire name. Names used by earlier deployments of the chaincode
    /// (`invoke`, `invoke2`, `getValue`, `getAssemblyLineStatus`,
    /// `getCaseID`) are accepted as aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s {
            "invoke" => Self::Transfer,
            "invoke2" => Self::TransferDouble,
            "getValue" => Self::GetBalance,
            "getAssemblyLineStatus" => Self::GetAssemblyStatus,
            "getCaseID" => Self::GetShippingCase,
            name => Self::ALL
                .into_iter()
                .find(|op| op.name() == name)
                .ok_or_else(|| EngineError::UnknownOperation(name.to_string()))?,
        };
        Ok(op)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip() {
        for op in Operation::ALL {
            assert_eq!(op.name().parse::<Operation>().unwrap(), op);
        }
    }

    #[test]
    fn legacy_aliases() {
        assert_eq!("invoke".parse::<Operation>().unwrap(), Operation::Transfer);
        assert_eq!("invoke2".parse::<Operation>().unwrap(), Operation::TransferDouble);
        assert_eq!("getValue".parse::<Operation>().unwrap(), Operation::GetBalance);
        assert_eq!(
            "getAssemblyLineStatus".parse::<Operation>().unwrap(),
            Operation::GetAssemblyStatus
        );
        assert_eq!("getCaseID".parse::<Operation>().unwrap(), Operation::GetShippingCase);
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "mint".parse::<Operation>().unwrap_err();
        assert!(matches!(err, EngineError::UnknownOperation(ref n) if n == "mint"));
    }

    #[test]
    fn matching_is_exact() {
        assert!("Transfer".parse::<Operation>().is_err());
        assert!(" transfer".parse::<Operation>().is_err());
    }

    #[test]
    fn arities_follow_the_interface_table() {
        assert_eq!(Operation::Init.arity(), 4);
        assert_eq!(Operation::Transfer.arity(), 3);
        assert_eq!(Operation::StartAssemblyLine.arity(), 9);
        assert_eq!(Operation::CreateShippingCase.arity(), 4);
        assert_eq!(Operation::GetShippingCase.arity(), 1);
    }

    #[test]
    fn reads_and_mutations() {
        let reads: Vec<_> = Operation::ALL.into_iter().filter(Operation::is_read).collect();
        assert_eq!(reads.len(), 4);
        assert_eq!(Operation::Delete.kind(), OperationKind::Mutation);
    }
}
