//! Catalog module
//!
//! This module contains the table catalog, schema definitions, and data types.

pub mod catalog;
pub mod schema;
pub mod types;

pub use catalog::{Catalog, Table};
pub use schema::{ColumnDef, Row, TableSchema};
pub use types::{ColumnType, Literal, Value};
