use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

// ---------------------------------------------------------------------------
// ColumnType
// ---------------------------------------------------------------------------

/// The type of a table column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// UTF-8 text.
    String,
    /// Signed integer.
    Int,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Int => write!(f, "int"),
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnDefinition
// ---------------------------------------------------------------------------

/// A named, typed column. Key columns together form the row's unique key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub column_type: ColumnType,
    pub key: bool,
}

impl ColumnDefinition {
    /// A column that is part of the row key.
    pub fn key(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            key: true,
        }
    }

    /// A plain value column.
    pub fn value(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            key: false,
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnValue / Row
// ---------------------------------------------------------------------------

/// A single cell value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ColumnValue {
    Int(i64),
    String(String),
}

impl ColumnValue {
    /// The column type this value satisfies.
    pub fn column_type(&self) -> ColumnType {
        match self {
            Self::Int(_) => ColumnType::Int,
            Self::String(_) => ColumnType::String,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Int(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::String(_) => None,
        }
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for ColumnValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ColumnValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for ColumnValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// An ordered list of column values, laid out in schema order.
///
/// An empty row is what the host ledger hands back for a missing key; the
/// ledger access boundary turns that into `None` so callers never see it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub columns: Vec<ColumnValue>,
}

impl Row {
    pub fn new(columns: Vec<ColumnValue>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ColumnValue> {
        self.columns.get(index)
    }
}

// ---------------------------------------------------------------------------
// TableSchema
// ---------------------------------------------------------------------------

/// A named table with a fixed, ordered column layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
}

impl TableSchema {
    /// Build a schema, checking that it has a name, at least one key column,
    /// and no duplicate column names.
    pub fn new(
        name: impl Into<String>,
        columns: Vec<ColumnDefinition>,
    ) -> Result<Self, TypeError> {
        let name = name.into();
        let invalid = |reason: &str| TypeError::InvalidSchema {
            table: name.clone(),
            reason: reason.to_string(),
        };

        if name.trim().is_empty() {
            return Err(invalid("table name must not be empty"));
        }
        if !columns.iter().any(|c| c.key) {
            return Err(invalid("at least one key column is required"));
        }
        let mut seen = HashSet::new();
        for column in &columns {
            if column.name.trim().is_empty() {
                return Err(invalid("column names must not be empty"));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(TypeError::InvalidSchema {
                    table: name.clone(),
                    reason: format!("duplicate column '{}'", column.name),
                });
            }
        }

        Ok(Self { name, columns })
    }

    /// Key column definitions in declaration order.
    pub fn key_columns(&self) -> impl Iterator<Item = &ColumnDefinition> {
        self.columns.iter().filter(|c| c.key)
    }

    /// Position of the named column, if it exists.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Check a row's arity and cell types against this schema.
    pub fn validate_row(&self, row: &Row) -> Result<(), TypeError> {
        if row.len() != self.columns.len() {
            return Err(TypeError::ColumnCount {
                table: self.name.clone(),
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        for (definition, value) in self.columns.iter().zip(&row.columns) {
            self.check_type(definition, value)?;
        }
        Ok(())
    }

    /// Check a key lookup against the key columns of this schema.
    pub fn validate_key(&self, key: &[ColumnValue]) -> Result<(), TypeError> {
        let expected = self.key_columns().count();
        if key.len() != expected {
            return Err(TypeError::KeyArity {
                table: self.name.clone(),
                expected,
                actual: key.len(),
            });
        }
        for (definition, value) in self.key_columns().zip(key) {
            self.check_type(definition, value)?;
        }
        Ok(())
    }

    /// Extract the key values of a row. The row must already be valid.
    pub fn key_of(&self, row: &Row) -> Vec<ColumnValue> {
        self.columns
            .iter()
            .zip(&row.columns)
            .filter(|(definition, _)| definition.key)
            .map(|(_, value)| value.clone())
            .collect()
    }

    fn check_type(
        &self,
        definition: &ColumnDefinition,
        value: &ColumnValue,
    ) -> Result<(), TypeError> {
        if value.column_type() != definition.column_type {
            return Err(TypeError::ColumnType {
                table: self.name.clone(),
                column: definition.name.clone(),
                expected: definition.column_type.to_string(),
                actual: value.column_type().to_string(),
            });
        }
        Ok(())
    }
}
