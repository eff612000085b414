//! Error types for ShaleDB
//!
//! This module defines all error types used throughout the command engine.

use thiserror::Error;

/// The main error type for ShaleDB
#[derive(Error, Debug)]
pub enum Error {
    // ========== Lexer Errors ==========
    #[error("Lexer error: unexpected character '{0}' at position {1}")]
    UnexpectedCharacter(char, usize),

    #[error("Lexer error: unterminated string literal starting at position {0}")]
    UnterminatedString(usize),

    #[error("Lexer error: invalid number at position {0}")]
    InvalidNumber(usize),

    // ========== Parser Errors ==========
    #[error("Parse error: expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    #[error("Parse error: unexpected end of input, expected {0}")]
    UnexpectedEof(String),

    #[error("Parse error: unknown column type '{0}'")]
    UnknownTypeName(String),

    #[error("Parse error: duplicate column '{0}' in insert values")]
    DuplicateKvKey(String),

    // ========== Protocol Errors ==========
    #[error("Protocol error: unknown command (opcode {opcode}, sub-opcode {sub_opcode})")]
    UnknownCommand { opcode: u8, sub_opcode: u8 },

    #[error("Protocol error: frame text is not valid UTF-8")]
    InvalidFrameText,

    #[error("Protocol error: frame exceeds {0} bytes without a terminator")]
    FrameTooLarge(usize),

    #[error("Protocol error: malformed response frame: {0}")]
    MalformedResponse(String),

    // ========== Catalog Errors ==========
    #[error("Catalog error: table '{0}' not found")]
    UnknownTable(String),

    #[error("Catalog error: table '{0}' already exists")]
    DuplicateTable(String),

    #[error("Catalog error: duplicate column '{0}' in table '{1}'")]
    DuplicateColumn(String, String),

    #[error("Schema mismatch for table '{table}': {reason}")]
    SchemaMismatch { table: String, reason: String },

    // ========== I/O Errors ==========
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    // ========== Internal Errors ==========
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for ShaleDB operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether a connection may keep processing commands after this error.
    ///
    /// Parse, decode, and catalog errors are local to one statement or
    /// frame. I/O failures and a frame that has outgrown the buffer cap
    /// are not: the stream can no longer be trusted to be frame-aligned.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::IoError(_) | Error::FrameTooLarge(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownTable("users".to_string());
        assert_eq!(err.to_string(), "Catalog error: table 'users' not found");

        let err = Error::UnexpectedCharacter('@', 5);
        assert_eq!(
            err.to_string(),
            "Lexer error: unexpected character '@' at position 5"
        );

        let err = Error::UnknownCommand {
            opcode: 3,
            sub_opcode: 7,
        };
        assert_eq!(
            err.to_string(),
            "Protocol error: unknown command (opcode 3, sub-opcode 7)"
        );
    }

    #[test]
    fn test_recoverability() {
        assert!(Error::UnknownTable("t".to_string()).is_recoverable());
        assert!(Error::InvalidFrameText.is_recoverable());
        assert!(Error::UnknownCommand {
            opcode: 0,
            sub_opcode: 0,
        }
        .is_recoverable());

        assert!(!Error::FrameTooLarge(65536).is_recoverable());
        let io = std::io::Error::from(std::io::ErrorKind::ConnectionReset);
        assert!(!Error::IoError(io).is_recoverable());
    }
}
