use chrono::NaiveDate;
use packline_types::{CaseId, ColumnDefinition, ColumnType, ColumnValue, Row, TableSchema};
use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult};
use crate::row::{format_date, RowReader, TableRecord};

const CASE_ID: &str = "caseId";
const PRIMARY_DEVICE_ID: &str = "primaryDeviceId";
const PRIMARY_DEVICE_TYPE: &str = "primaryDeviceType";
const SECONDARY_DEVICE_ID: &str = "secondaryDeviceId";
const SECONDARY_DEVICE_TYPE: &str = "secondaryDeviceType";
const PACKAGING_DATE: &str = "packagingDate";
const TEST_RESULT: &str = "testResult";
const TEST_DATE: &str = "testDate";
const PACKAGING_LINE_STATE: &str = "packagingLineState";

/// Test result stamped on every new case.
pub const INITIAL_TEST_RESULT: &str = "Within Range";

/// Packaging line state of every new case.
pub const INITIAL_LINE_STATE: &str = "QA";

/// A device placed in a case, e.g. a charger or a holder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Device {
    pub id: String,
    pub device_type: String,
}

impl Device {
    pub fn new(id: impl Into<String>, device_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            device_type: device_type.into(),
        }
    }
}

/// A shipping case holding a primary and a secondary device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingCase {
    pub case_id: CaseId,
    pub primary_device_id: String,
    pub primary_device_type: String,
    pub secondary_device_id: String,
    pub secondary_device_type: String,
    pub packaging_date: NaiveDate,
    pub test_result: String,
    pub test_date: NaiveDate,
    pub packaging_line_state: String,
}

impl ShippingCase {
    /// A case packed on `date`, entering QA with a passing test result.
    pub fn packed(case_id: CaseId, primary: Device, secondary: Device, date: NaiveDate) -> Self {
        Self {
            case_id,
            primary_device_id: primary.id,
            primary_device_type: primary.device_type,
            secondary_device_id: secondary.id,
            secondary_device_type: secondary.device_type,
            packaging_date: date,
            test_result: INITIAL_TEST_RESULT.to_string(),
            test_date: date,
            packaging_line_state: INITIAL_LINE_STATE.to_string(),
        }
    }

    /// Key for looking a case up by id.
    pub fn key_for(case_id: CaseId) -> Vec<ColumnValue> {
        vec![case_id.to_column()]
    }

    /// Full JSON form returned to callers.
    pub fn to_json(&self) -> CodecResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| CodecError::Json(e.to_string()))
    }

    pub fn from_json(bytes: &[u8]) -> CodecResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::Json(e.to_string()))
    }
}

impl TableRecord for ShippingCase {
    const TABLE: &'static str = "ShippingCase";

    fn schema() -> TableSchema {
        let mut columns = vec![ColumnDefinition::key(CASE_ID, ColumnType::Int)];
        columns.extend(
            [
                PRIMARY_DEVICE_ID,
                PRIMARY_DEVICE_TYPE,
                SECONDARY_DEVICE_ID,
                SECONDARY_DEVICE_TYPE,
                PACKAGING_DATE,
                TEST_RESULT,
                TEST_DATE,
                PACKAGING_LINE_STATE,
            ]
            .into_iter()
            .map(|name| ColumnDefinition::value(name, ColumnType::String)),
        );
        TableSchema {
            name: Self::TABLE.to_string(),
            columns,
        }
    }

    fn key(&self) -> Vec<ColumnValue> {
        Self::key_for(self.case_id)
    }

    fn to_row(&self) -> Row {
        Row::new(vec![
            self.case_id.to_column(),
            self.primary_device_id.as_str().into(),
            self.primary_device_type.as_str().into(),
            self.secondary_device_id.as_str().into(),
            self.secondary_device_type.as_str().into(),
            format_date(self.packaging_date).into(),
            self.test_result.as_str().into(),
            format_date(self.test_date).into(),
            self.packaging_line_state.as_str().into(),
        ])
    }

    fn from_row(row: &Row) -> CodecResult<Self> {
        let r = RowReader::new(Self::schema(), row)?;
        Ok(Self {
            case_id: CaseId::from_column(r.value(CASE_ID)?)?,
            primary_device_id: r.string(PRIMARY_DEVICE_ID)?,
            primary_device_type: r.string(PRIMARY_DEVICE_TYPE)?,
            secondary_device_id: r.string(SECONDARY_DEVICE_ID)?,
            secondary_device_type: r.string(SECONDARY_DEVICE_TYPE)?,
            packaging_date: r.date(PACKAGING_DATE)?,
            test_result: r.string(TEST_RESULT)?,
            test_date: r.date(TEST_DATE)?,
            packaging_line_state: r.string(PACKAGING_LINE_STATE)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case() -> ShippingCase {
        ShippingCase::packed(
            CaseId::new(77).unwrap(),
            Device::new("A-1", "Charger"),
            Device::new("A-2", "Holder"),
            NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        )
    }

    #[test]
    fn packed_case_has_initial_state() {
        let c = case();
        assert_eq!(c.test_result, "Within Range");
        assert_eq!(c.packaging_line_state, "QA");
        assert_eq!(c.packaging_date, c.test_date);
    }

    #[test]
    fn row_roundtrip() {
        let row = case().to_row();
        ShippingCase::schema().validate_row(&row).unwrap();
        assert_eq!(row.get(5), Some(&ColumnValue::from("2026-10-18")));
        assert_eq!(ShippingCase::from_row(&row).unwrap(), case());
    }

    #[test]
    fn from_row_rejects_bad_date() {
        let mut row = case().to_row();
        row.columns[7] = "18-10-2026".into();
        assert!(matches!(
            ShippingCase::from_row(&row),
            Err(CodecError::InvalidDate { .. })
        ));
    }

    #[test]
    fn json_form_uses_camel_case() {
        let json: serde_json::Value = serde_json::from_slice(&case().to_json().unwrap()).unwrap();
        assert_eq!(json["caseId"], 77);
        assert_eq!(json["secondaryDeviceType"], "Holder");
        assert_eq!(json["packagingDate"], "2026-10-18");
        assert_eq!(json["packagingLineState"], "QA");
        assert_eq!(ShippingCase::from_json(&case().to_json().unwrap()).unwrap(), case());
    }
}
