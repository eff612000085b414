//! Data types for ShaleDB
//!
//! This module defines the column types a table schema may declare, the
//! untyped literals the two command surfaces produce, and the typed values
//! a table actually stores.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Column types supported by table schemas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// Opaque textual identifier
    Key,
    /// Non-negative 64-bit integer
    Uint,
}

impl ColumnType {
    /// Parse a type name as it appears in a script statement
    pub fn from_type_name(s: &str) -> Option<ColumnType> {
        match s.to_lowercase().as_str() {
            "key" => Some(ColumnType::Key),
            "uint" => Some(ColumnType::Uint),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Key => write!(f, "key"),
            ColumnType::Uint => write!(f, "uint"),
        }
    }
}

/// An untyped literal as supplied by a script statement or a binary frame.
///
/// Integer literals keep their sign so that a negative number reaches type
/// validation and is rejected there, not by the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Literal {
    /// Quoted script string, or raw frame text
    Str(String),
    /// Bare script integer
    Int(i64),
}

impl Literal {
    /// Coerce this literal against a declared column type.
    ///
    /// String literals satisfy `key` directly, and `uint` when they parse
    /// as an unsigned number (frame text carries no type marker, so its
    /// compatibility is judged by form). Integer literals satisfy only
    /// `uint`, and only when non-negative.
    pub fn coerce(&self, ty: ColumnType) -> Option<Value> {
        match (self, ty) {
            (Literal::Str(s), ColumnType::Key) => Some(Value::Key(s.clone())),
            (Literal::Str(s), ColumnType::Uint) => s.parse::<u64>().ok().map(Value::Uint),
            (Literal::Int(n), ColumnType::Uint) => u64::try_from(*n).ok().map(Value::Uint),
            (Literal::Int(_), ColumnType::Key) => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Str(s) => write!(f, "\"{}\"", s),
            Literal::Int(n) => write!(f, "{}", n),
        }
    }
}

/// A stored, typed value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    /// Opaque identifier
    Key(String),
    /// Unsigned 64-bit integer
    Uint(u64),
}

impl Value {
    /// The column type this value belongs to
    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Key(_) => ColumnType::Key,
            Value::Uint(_) => ColumnType::Uint,
        }
    }

    /// Get the key text, if this is a key value
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Value::Key(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer, if this is a uint value
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Value::Uint(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Key(s) => write!(f, "{}", s),
            Value::Uint(n) => write!(f, "{}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name_parsing() {
        assert_eq!(ColumnType::from_type_name("key"), Some(ColumnType::Key));
        assert_eq!(ColumnType::from_type_name("UINT"), Some(ColumnType::Uint));
        assert_eq!(ColumnType::from_type_name("text"), None);
    }

    #[test]
    fn test_string_coercion() {
        let lit = Literal::Str("alice".to_string());
        assert_eq!(lit.coerce(ColumnType::Key), Some(Value::Key("alice".to_string())));
        assert_eq!(lit.coerce(ColumnType::Uint), None);

        let numeric = Literal::Str("42".to_string());
        assert_eq!(numeric.coerce(ColumnType::Uint), Some(Value::Uint(42)));
    }

    #[test]
    fn test_integer_coercion() {
        let lit = Literal::Int(3);
        assert_eq!(lit.coerce(ColumnType::Uint), Some(Value::Uint(3)));
        assert_eq!(lit.coerce(ColumnType::Key), None);

        let negative = Literal::Int(-3);
        assert_eq!(negative.coerce(ColumnType::Uint), None);
    }
}
