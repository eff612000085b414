//! Table Catalog for ShaleDB
//!
//! This module owns the in-memory table store: the mapping from table name
//! to schema and rows. A single reader-writer lock serializes all mutations,
//! so row validation and the append it guards happen atomically with respect
//! to concurrent connections.

use std::collections::HashMap;
use std::sync::RwLock;

use indexmap::IndexMap;

use super::schema::{ColumnDef, Row, TableSchema};
use super::types::Literal;
use crate::error::{Error, Result};

/// A table: its schema plus stored rows, append-only
#[derive(Debug, Clone)]
pub struct Table {
    /// Schema, fixed at creation
    schema: TableSchema,
    /// Rows in insertion order
    rows: Vec<Row>,
}

impl Table {
    fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Get the table schema
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Get stored rows in insertion order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of stored rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn append(&mut self, row: Row) -> usize {
        self.rows.push(row);
        self.rows.len()
    }
}

/// Table Catalog - manages all tables in the store
#[derive(Debug)]
pub struct Catalog {
    /// Tables by name
    tables: RwLock<HashMap<String, Table>>,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Create a new table
    pub fn create_table(&self, name: &str, columns: Vec<ColumnDef>) -> Result<()> {
        let mut tables = self.tables.write().unwrap();

        if tables.contains_key(name) {
            return Err(Error::DuplicateTable(name.to_string()));
        }

        let schema = TableSchema::new(name, columns)?;
        tables.insert(name.to_string(), Table::new(schema));
        Ok(())
    }

    /// Append one row to a table.
    ///
    /// The supplied values must name exactly the table's declared columns,
    /// and every value must coerce to its column's type. Validation and the
    /// append happen under one write lock, so a row observed valid is the
    /// row that lands. Returns the new row's 1-based ordinal.
    pub fn insert_row(&self, table: &str, values: &IndexMap<String, Literal>) -> Result<usize> {
        let mut tables = self.tables.write().unwrap();

        let entry = tables
            .get_mut(table)
            .ok_or_else(|| Error::UnknownTable(table.to_string()))?;

        let mut row = Vec::with_capacity(entry.schema.column_count());
        for col in entry.schema.columns() {
            let literal = values
                .get(col.name.as_str())
                .ok_or_else(|| Error::SchemaMismatch {
                    table: table.to_string(),
                    reason: format!("missing column '{}'", col.name),
                })?;
            let value = literal
                .coerce(col.column_type)
                .ok_or_else(|| Error::SchemaMismatch {
                    table: table.to_string(),
                    reason: format!(
                        "value {} is not valid for {} column '{}'",
                        literal, col.column_type, col.name
                    ),
                })?;
            row.push(value);
        }

        // Every declared column is accounted for; a size mismatch now can
        // only mean extra keys.
        if values.len() != entry.schema.column_count() {
            let extra: Vec<&str> = values
                .keys()
                .map(String::as_str)
                .filter(|k| !entry.schema.has_column(k))
                .collect();
            return Err(Error::SchemaMismatch {
                table: table.to_string(),
                reason: format!("unknown column(s): {}", extra.join(", ")),
            });
        }

        Ok(entry.append(Row::new(row)))
    }

    /// Drop a table and discard its rows
    pub fn drop_table(&self, name: &str) -> Result<()> {
        let mut tables = self.tables.write().unwrap();

        if tables.remove(name).is_none() {
            return Err(Error::UnknownTable(name.to_string()));
        }

        Ok(())
    }

    /// Get a point-in-time snapshot of a table
    pub fn get_table(&self, name: &str) -> Result<Table> {
        let tables = self.tables.read().unwrap();
        tables
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownTable(name.to_string()))
    }

    /// Check if a table exists
    pub fn table_exists(&self, name: &str) -> bool {
        let tables = self.tables.read().unwrap();
        tables.contains_key(name)
    }

    /// Number of rows currently stored in a table
    pub fn row_count(&self, name: &str) -> Result<usize> {
        let tables = self.tables.read().unwrap();
        tables
            .get(name)
            .map(|t| t.rows.len())
            .ok_or_else(|| Error::UnknownTable(name.to_string()))
    }

    /// List all table names
    pub fn list_tables(&self) -> Vec<String> {
        let tables = self.tables.read().unwrap();
        tables.keys().cloned().collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
