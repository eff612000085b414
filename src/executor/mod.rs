//! Command execution module
//!
//! This module applies decoded commands to the table catalog. Commands are
//! executed strictly in the order they were decoded on their connection;
//! each command either fully applies or leaves the catalog unchanged.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::command::Command;
use crate::error::Result;

/// Outcome of one successfully executed command
#[derive(Debug, Clone, PartialEq)]
pub struct ExecOutcome {
    /// Rows affected (1 for a successful insert, 0 otherwise)
    pub affected_rows: usize,
    /// Ordinal of a newly inserted row (1-based)
    pub row: Option<usize>,
    /// Human-readable status message
    pub message: String,
}

impl ExecOutcome {
    fn with_message(message: impl Into<String>) -> Self {
        Self {
            affected_rows: 0,
            row: None,
            message: message.into(),
        }
    }

    fn inserted(row: usize, message: impl Into<String>) -> Self {
        Self {
            affected_rows: 1,
            row: Some(row),
            message: message.into(),
        }
    }
}

/// Execution Engine - applies commands to a shared catalog
pub struct ExecutionEngine {
    catalog: Arc<Catalog>,
}

impl ExecutionEngine {
    /// Create a new execution engine over a shared catalog
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Apply one command, producing exactly one outcome or error
    pub fn execute(&self, command: Command) -> Result<ExecOutcome> {
        match command {
            Command::CreateTable { name, columns } => {
                self.catalog.create_table(&name, columns)?;
                Ok(ExecOutcome::with_message(format!("Table '{}' created", name)))
            }
            Command::InsertRow { table, values } => {
                let row = self.catalog.insert_row(&table, &values)?;
                Ok(ExecOutcome::inserted(
                    row,
                    format!("1 row inserted into '{}' (row {})", table, row),
                ))
            }
            Command::DropTable { name } => {
                self.catalog.drop_table(&name)?;
                Ok(ExecOutcome::with_message(format!("Table '{}' dropped", name)))
            }
        }
    }
}
