//! Script token definitions
//!
//! This module defines all tokens that can appear in script statements.

use std::fmt;

/// Script token types
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // ========== Keywords ==========
    /// `table` - create a table
    Table,
    /// `column` - one column declaration inside a table statement
    Column,
    /// `insert` - append a row
    Insert,
    /// `kv` - one column/value pair inside an insert statement
    Kv,
    /// `drop_table` - remove a table
    DropTable,
    /// `key` - key column type
    Key,
    /// `uint` - unsigned integer column type
    Uint,

    // ========== Literals ==========
    /// Integer literal
    IntegerLiteral(i64),
    /// String literal (double-quoted)
    StringLiteral(String),
    /// Unquoted word that is not a keyword
    Identifier(String),

    // ========== Delimiters ==========
    /// (
    LParen,
    /// )
    RParen,
    /// {
    LBrace,
    /// }
    RBrace,
    /// ,
    Comma,
    /// ;
    Semicolon,

    // ========== Special ==========
    /// End of input
    Eof,
}

impl Token {
    /// Try to match a word against the keyword set (case-insensitive)
    pub fn from_keyword(s: &str) -> Option<Token> {
        match s.to_lowercase().as_str() {
            "table" => Some(Token::Table),
            "column" => Some(Token::Column),
            "insert" => Some(Token::Insert),
            "kv" => Some(Token::Kv),
            "drop_table" => Some(Token::DropTable),
            "key" => Some(Token::Key),
            "uint" => Some(Token::Uint),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Table => write!(f, "table"),
            Token::Column => write!(f, "column"),
            Token::Insert => write!(f, "insert"),
            Token::Kv => write!(f, "kv"),
            Token::DropTable => write!(f, "drop_table"),
            Token::Key => write!(f, "key"),
            Token::Uint => write!(f, "uint"),
            Token::IntegerLiteral(n) => write!(f, "{}", n),
            Token::StringLiteral(s) => write!(f, "\"{}\"", s),
            Token::Identifier(s) => write!(f, "{}", s),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Comma => write!(f, ","),
            Token::Semicolon => write!(f, ";"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}
