use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use packline_types::{ColumnDefinition, ColumnType, ColumnValue, Row, TableSchema};
use serde::{Deserialize, Serialize};

use crate::error::CodecResult;
use crate::row::{RowReader, TableRecord};

const ASSEMBLY_ID: &str = "assemblyId";
const SERIAL_ID: &str = "serialId";
const FILAMENT: &str = "originalFilamentBatchId";
const LED: &str = "originalLedBatchId";
const CIRCUIT_BOARD: &str = "originalCircuitBoardBatchId";
const WIRE: &str = "originalWireBatchId";
const CASING: &str = "originalCasingBatchId";
const ADAPTOR: &str = "originalAdaptorBatchId";
const STICK_POD: &str = "originalStickPodBatchId";
const STATUS: &str = "assemblyStatus";

// ---------------------------------------------------------------------------
// AssemblyStatus
// ---------------------------------------------------------------------------

/// Progress of an assembly. Statuses outside the two known ones are kept
/// verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssemblyStatus {
    InProgress,
    Completed,
    Other(String),
}

impl AssemblyStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::InProgress => "InProgress",
            Self::Completed => "Completed",
            Self::Other(s) => s,
        }
    }
}

impl FromStr for AssemblyStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "InProgress" => Self::InProgress,
            "Completed" => Self::Completed,
            other => Self::Other(other.to_string()),
        })
    }
}

impl From<String> for AssemblyStatus {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}

impl From<AssemblyStatus> for String {
    fn from(status: AssemblyStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for AssemblyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// BatchLineage
// ---------------------------------------------------------------------------

/// Raw-material batches an assembly was built from. Referenced by value;
/// batches live in an upstream system.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchLineage {
    #[serde(rename = "originalFilamentBatchId")]
    pub filament: String,
    #[serde(rename = "originalLedBatchId")]
    pub led: String,
    #[serde(rename = "originalCircuitBoardBatchId")]
    pub circuit_board: String,
    #[serde(rename = "originalWireBatchId")]
    pub wire: String,
    #[serde(rename = "originalCasingBatchId")]
    pub casing: String,
    #[serde(rename = "originalAdaptorBatchId")]
    pub adaptor: String,
    #[serde(rename = "originalStickPodBatchId")]
    pub stick_pod: String,
}

impl BatchLineage {
    /// Number of batch columns.
    pub const LEN: usize = 7;

    /// Build from batch ids in column order (filament, LED, circuit board,
    /// wire, casing, adaptor, stick pod).
    pub fn from_ordered(batches: [String; Self::LEN]) -> Self {
        let [filament, led, circuit_board, wire, casing, adaptor, stick_pod] = batches;
        Self {
            filament,
            led,
            circuit_board,
            wire,
            casing,
            adaptor,
            stick_pod,
        }
    }
}

// ---------------------------------------------------------------------------
// AssemblyRecord
// ---------------------------------------------------------------------------

/// One assembled device on the line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyRecord {
    pub assembly_id: String,
    pub serial_id: String,
    #[serde(flatten)]
    pub batches: BatchLineage,
    pub assembly_status: AssemblyStatus,
}

impl AssemblyRecord {
    /// A freshly started assembly.
    pub fn started(assembly_id: String, serial_id: String, batches: BatchLineage) -> Self {
        Self {
            assembly_id,
            serial_id,
            batches,
            assembly_status: AssemblyStatus::InProgress,
        }
    }

    /// Key for looking an assembly up by id.
    pub fn key_for(assembly_id: &str) -> Vec<ColumnValue> {
        vec![ColumnValue::from(assembly_id)]
    }
}

impl TableRecord for AssemblyRecord {
    const TABLE: &'static str = "AssemblyLine";

    fn schema() -> TableSchema {
        let mut columns = vec![ColumnDefinition::key(ASSEMBLY_ID, ColumnType::String)];
        columns.extend(
            [SERIAL_ID, FILAMENT, LED, CIRCUIT_BOARD, WIRE, CASING, ADAPTOR, STICK_POD, STATUS]
                .into_iter()
                .map(|name| ColumnDefinition::value(name, ColumnType::String)),
        );
        TableSchema {
            name: Self::TABLE.to_string(),
            columns,
        }
    }

    fn key(&self) -> Vec<ColumnValue> {
        Self::key_for(&self.assembly_id)
    }

    fn to_row(&self) -> Row {
        let b = &self.batches;
        Row::new(vec![
            self.assembly_id.as_str().into(),
            self.serial_id.as_str().into(),
            b.filament.as_str().into(),
            b.led.as_str().into(),
            b.circuit_board.as_str().into(),
            b.wire.as_str().into(),
            b.casing.as_str().into(),
            b.adaptor.as_str().into(),
            b.stick_pod.as_str().into(),
            self.assembly_status.as_str().into(),
        ])
    }

    fn from_row(row: &Row) -> CodecResult<Self> {
        let r = RowReader::new(Self::schema(), row)?;
        Ok(Self {
            assembly_id: r.string(ASSEMBLY_ID)?,
            serial_id: r.string(SERIAL_ID)?,
            batches: BatchLineage {
                filament: r.string(FILAMENT)?,
                led: r.string(LED)?,
                circuit_board: r.string(CIRCUIT_BOARD)?,
                wire: r.string(WIRE)?,
                casing: r.string(CASING)?,
                adaptor: r.string(ADAPTOR)?,
                stick_pod: r.string(STICK_POD)?,
            },
            assembly_status: r.string(STATUS)?.into(),
        })
    }
}
