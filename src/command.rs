//! Command model
//!
//! The unified representation of a decoded command. Both the binary frame
//! decoder and the script parser produce `Command` values; the execution
//! engine applies them without caring which surface they came from.

use indexmap::IndexMap;

use crate::catalog::{ColumnDef, Literal};

/// A command against the table store
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a new table with the given columns
    CreateTable {
        name: String,
        columns: Vec<ColumnDef>,
    },
    /// Append one row to a table. Values are keyed by column name, in the
    /// order the source supplied them.
    InsertRow {
        table: String,
        values: IndexMap<String, Literal>,
    },
    /// Remove a table and all its rows
    DropTable { name: String },
}

impl Command {
    /// Name of the table this command targets
    pub fn table_name(&self) -> &str {
        match self {
            Command::CreateTable { name, .. } => name,
            Command::InsertRow { table, .. } => table,
            Command::DropTable { name } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ColumnType;

    #[test]
    fn test_table_name() {
        let create = Command::CreateTable {
            name: "users".to_string(),
            columns: vec![ColumnDef::new("id", ColumnType::Key)],
        };
        assert_eq!(create.table_name(), "users");

        let insert = Command::InsertRow {
            table: "users".to_string(),
            values: IndexMap::new(),
        };
        assert_eq!(insert.table_name(), "users");

        let drop = Command::DropTable {
            name: "users".to_string(),
        };
        assert_eq!(drop.table_name(), "users");
    }
}
