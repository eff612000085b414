//! Script parser
//!
//! Recursive-descent parser over the token stream. Each statement maps to
//! exactly one command:
//!
//! - `table("name", {column(type, "col"), ...})` creates a table
//! - `insert("name", {kv("col", value), ...})` appends a row
//! - `drop_table("name")` removes a table
//!
//! Statements may end with an optional semicolon. Parsing is fail-fast: the
//! first malformed statement aborts the rest of the submitted text.

use indexmap::IndexMap;

use super::lexer::Lexer;
use super::token::Token;
use crate::catalog::{ColumnDef, ColumnType, Literal};
use crate::command::Command;
use crate::error::{Error, Result};

/// Script parser
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    /// Create a parser for the given script text
    pub fn new(input: &str) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
        })
    }

    /// Parse a single statement
    pub fn parse(&mut self) -> Result<Command> {
        let command = self.parse_statement()?;
        if self.check(&Token::Semicolon) {
            self.advance();
        }
        Ok(command)
    }

    /// Parse all statements in source order
    pub fn parse_all(&mut self) -> Result<Vec<Command>> {
        let mut commands = Vec::new();
        while !self.is_at_end() {
            commands.push(self.parse()?);
        }
        Ok(commands)
    }

    // ========== Statement Parsing ==========

    fn parse_statement(&mut self) -> Result<Command> {
        match self.current() {
            Token::Table => self.parse_table(),
            Token::Insert => self.parse_insert(),
            Token::DropTable => self.parse_drop_table(),
            other => Err(Error::UnexpectedToken {
                expected: "table, insert, or drop_table".to_string(),
                found: other.to_string(),
            }),
        }
    }

    fn parse_table(&mut self) -> Result<Command> {
        self.expect(&Token::Table)?;
        self.expect(&Token::LParen)?;
        let name = self.expect_string()?;
        self.expect(&Token::Comma)?;
        self.expect(&Token::LBrace)?;

        let mut columns = Vec::new();
        loop {
            columns.push(self.parse_column_def()?);
            if !self.check(&Token::Comma) {
                break;
            }
            self.advance();
        }

        self.expect(&Token::RBrace)?;
        self.expect(&Token::RParen)?;

        Ok(Command::CreateTable { name, columns })
    }

    fn parse_column_def(&mut self) -> Result<ColumnDef> {
        self.expect(&Token::Column)?;
        self.expect(&Token::LParen)?;
        let column_type = self.parse_type_name()?;
        self.expect(&Token::Comma)?;
        let name = self.expect_string()?;
        self.expect(&Token::RParen)?;
        Ok(ColumnDef::new(name, column_type))
    }

    fn parse_type_name(&mut self) -> Result<ColumnType> {
        match self.current().clone() {
            Token::Key => {
                self.advance();
                Ok(ColumnType::Key)
            }
            Token::Uint => {
                self.advance();
                Ok(ColumnType::Uint)
            }
            Token::Identifier(name) => Err(Error::UnknownTypeName(name)),
            Token::Eof => Err(Error::UnexpectedEof("column type".to_string())),
            other => Err(Error::UnexpectedToken {
                expected: "column type (key or uint)".to_string(),
                found: other.to_string(),
            }),
        }
    }

    fn parse_insert(&mut self) -> Result<Command> {
        self.expect(&Token::Insert)?;
        self.expect(&Token::LParen)?;
        let table = self.expect_string()?;
        self.expect(&Token::Comma)?;
        self.expect(&Token::LBrace)?;

        let mut values = IndexMap::new();
        loop {
            let (column, literal) = self.parse_kv_pair()?;
            if values.insert(column.clone(), literal).is_some() {
                return Err(Error::DuplicateKvKey(column));
            }
            if !self.check(&Token::Comma) {
                break;
            }
            self.advance();
        }

        self.expect(&Token::RBrace)?;
        self.expect(&Token::RParen)?;

        Ok(Command::InsertRow { table, values })
    }

    fn parse_kv_pair(&mut self) -> Result<(String, Literal)> {
        self.expect(&Token::Kv)?;
        self.expect(&Token::LParen)?;
        let column = self.expect_string()?;
        self.expect(&Token::Comma)?;
        let literal = self.parse_literal()?;
        self.expect(&Token::RParen)?;
        Ok((column, literal))
    }

    fn parse_literal(&mut self) -> Result<Literal> {
        match self.current().clone() {
            Token::StringLiteral(s) => {
                self.advance();
                Ok(Literal::Str(s))
            }
            Token::IntegerLiteral(n) => {
                self.advance();
                Ok(Literal::Int(n))
            }
            Token::Eof => Err(Error::UnexpectedEof("string or integer value".to_string())),
            other => Err(Error::UnexpectedToken {
                expected: "string or integer value".to_string(),
                found: other.to_string(),
            }),
        }
    }

    fn parse_drop_table(&mut self) -> Result<Command> {
        self.expect(&Token::DropTable)?;
        self.expect(&Token::LParen)?;
        let name = self.expect_string()?;
        self.expect(&Token::RParen)?;
        Ok(Command::DropTable { name })
    }

    // ========== Parser Utilities ==========

    fn current(&self) -> &Token {
        self.tokens.get(self.position).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current(), Token::Eof)
    }

    fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.current()) == std::mem::discriminant(token)
    }

    fn expect(&mut self, token: &Token) -> Result<()> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else if self.is_at_end() {
            Err(Error::UnexpectedEof(token.to_string()))
        } else {
            Err(Error::UnexpectedToken {
                expected: token.to_string(),
                found: self.current().to_string(),
            })
        }
    }

    fn expect_string(&mut self) -> Result<String> {
        match self.current().clone() {
            Token::StringLiteral(s) => {
                self.advance();
                Ok(s)
            }
            Token::Eof => Err(Error::UnexpectedEof("string literal".to_string())),
            other => Err(Error::UnexpectedToken {
                expected: "string literal".to_string(),
                found: other.to_string(),
            }),
        }
    }
}
