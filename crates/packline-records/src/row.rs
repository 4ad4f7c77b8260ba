use chrono::NaiveDate;
use packline_types::{ColumnValue, Row, TableSchema};

use crate::error::{CodecError, CodecResult};

/// Date format used for every date column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A record persisted as one row of a fixed-schema table.
pub trait TableRecord: Sized {
    /// Name of the backing table.
    const TABLE: &'static str;

    /// Column layout of the backing table.
    fn schema() -> TableSchema;

    /// Key column values identifying this record.
    fn key(&self) -> Vec<ColumnValue>;

    /// Encode into a row laid out in schema order.
    fn to_row(&self) -> Row;

    /// Decode from a row fetched from the backing table.
    fn from_row(row: &Row) -> CodecResult<Self>;
}

/// Reads row cells by column name.
///
/// The row is checked against the schema once, on construction; the typed
/// getters then only have to look the column up.
pub struct RowReader<'a> {
    schema: TableSchema,
    row: &'a Row,
}

impl<'a> RowReader<'a> {
    pub fn new(schema: TableSchema, row: &'a Row) -> CodecResult<Self> {
        schema.validate_row(row)?;
        Ok(Self { schema, row })
    }

    /// Raw cell value.
    pub fn value(&self, column: &str) -> CodecResult<&'a ColumnValue> {
        self.schema
            .column_index(column)
            .and_then(|index| self.row.get(index))
            .ok_or_else(|| CodecError::MissingColumn {
                table: self.schema.name.clone(),
                column: column.to_string(),
            })
    }

    pub fn string(&self, column: &str) -> CodecResult<String> {
        self.value(column)?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.type_error(column, "string"))
    }

    pub fn int(&self, column: &str) -> CodecResult<i64> {
        self.value(column)?
            .as_int()
            .ok_or_else(|| self.type_error(column, "int"))
    }

    pub fn date(&self, column: &str) -> CodecResult<NaiveDate> {
        let text = self.string(column)?;
        NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(|_| CodecError::InvalidDate {
            column: column.to_string(),
            value: text,
        })
    }

    fn type_error(&self, column: &str, expected: &'static str) -> CodecError {
        CodecError::ColumnType {
            table: self.schema.name.clone(),
            column: column.to_string(),
            expected,
        }
    }
}

/// Format a date for a date column.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use packline_types::{ColumnDefinition, ColumnType};

    fn schema() -> TableSchema {
        TableSchema::new(
            "Log",
            vec![
                ColumnDefinition::key("id", ColumnType::Int),
                ColumnDefinition::value("day", ColumnType::String),
            ],
        )
        .unwrap()
    }

    #[test]
    fn reads_by_name() {
        let row = Row::new(vec![5.into(), "2024-02-29".into()]);
        let reader = RowReader::new(schema(), &row).unwrap();
        assert_eq!(reader.int("id").unwrap(), 5);
        assert_eq!(reader.string("day").unwrap(), "2024-02-29");
        assert_eq!(
            reader.date("day").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn rejects_row_not_matching_schema() {
        let row = Row::new(vec![5.into()]);
        assert!(matches!(
            RowReader::new(schema(), &row),
            Err(CodecError::Type(_))
        ));
    }

    #[test]
    fn missing_column_and_wrong_type() {
        let row = Row::new(vec![5.into(), "x".into()]);
        let reader = RowReader::new(schema(), &row).unwrap();
        assert!(matches!(
            reader.string("nope"),
            Err(CodecError::MissingColumn { .. })
        ));
        assert!(matches!(
            reader.string("id"),
            Err(CodecError::ColumnType { expected: "string", .. })
        ));
        assert!(matches!(
            reader.date("day"),
            Err(CodecError::InvalidDate { .. })
        ));
    }

    #[test]
    fn format_date_is_iso() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 7).unwrap();
        assert_eq!(format_date(date), "2026-01-07");
    }
}
