//! Schema definitions for ShaleDB
//!
//! This module defines table schemas, column metadata, and stored rows.

use serde::{Deserialize, Serialize};

use super::types::{ColumnType, Value};
use crate::error::{Error, Result};

/// Column definition in a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name
    pub name: String,
    /// Declared type
    pub column_type: ColumnType,
}

impl ColumnDef {
    /// Create a new column definition
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// Table schema - the ordered column layout of a table, fixed at creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name
    name: String,
    /// Ordered list of columns
    columns: Vec<ColumnDef>,
}

impl TableSchema {
    /// Create a schema, rejecting duplicate column names
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDef>) -> Result<Self> {
        let name = name.into();
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == col.name) {
                return Err(Error::DuplicateColumn(col.name.clone(), name));
            }
        }
        Ok(Self { name, columns })
    }

    /// Get the table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get all columns in declaration order
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Get number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Check if a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Get column names in declaration order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// A stored row: one value per schema column, in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// Create a new row from values
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Get a value by column position
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Get all values
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row has no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_creation() {
        let schema = TableSchema::new(
            "users",
            vec![
                ColumnDef::new("id", ColumnType::Key),
                ColumnDef::new("age", ColumnType::Uint),
            ],
        )
        .unwrap();

        assert_eq!(schema.name(), "users");
        assert_eq!(schema.column_count(), 2);
        assert!(schema.has_column("id"));
        assert!(!schema.has_column("unknown"));
        assert_eq!(schema.column_names(), vec!["id", "age"]);

        let age = schema.column("age").unwrap();
        assert_eq!(age.column_type, ColumnType::Uint);
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let result = TableSchema::new(
            "users",
            vec![
                ColumnDef::new("id", ColumnType::Key),
                ColumnDef::new("id", ColumnType::Uint),
            ],
        );

        assert!(matches!(result, Err(Error::DuplicateColumn(col, table))
            if col == "id" && table == "users"));
    }

    #[test]
    fn test_row_access() {
        let row = Row::new(vec![
            Value::Key("alice".to_string()),
            Value::Uint(30),
        ]);

        assert_eq!(row.len(), 2);
        assert_eq!(row.get(0), Some(&Value::Key("alice".to_string())));
        assert_eq!(row.get(1), Some(&Value::Uint(30)));
        assert_eq!(row.get(2), None);
    }
}
