//! Script lexer
//!
//! Converts script text into a stream of tokens. The dialect is small:
//! keywords, double-quoted strings, integers, a few delimiters, and `--`
//! line comments.

use super::token::Token;
use crate::error::{Error, Result};

/// Lexical analyzer for script statements
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    /// Create a new lexer for the given input
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            if token == Token::Eof {
                tokens.push(token);
                break;
            }
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();
        self.skip_comments();

        if self.is_at_end() {
            return Ok(Token::Eof);
        }

        let ch = self.current_char();

        match ch {
            '(' => {
                self.advance();
                Ok(Token::LParen)
            }
            ')' => {
                self.advance();
                Ok(Token::RParen)
            }
            '{' => {
                self.advance();
                Ok(Token::LBrace)
            }
            '}' => {
                self.advance();
                Ok(Token::RBrace)
            }
            ',' => {
                self.advance();
                Ok(Token::Comma)
            }
            ';' => {
                self.advance();
                Ok(Token::Semicolon)
            }
            '"' => self.read_string(),
            '-' => {
                // A lone minus only makes sense as the sign of an integer;
                // a `--` comment was already consumed above.
                self.advance();
                if !self.is_at_end() && self.current_char().is_ascii_digit() {
                    match self.read_number()? {
                        Token::IntegerLiteral(n) => Ok(Token::IntegerLiteral(-n)),
                        other => Ok(other),
                    }
                } else {
                    Err(Error::UnexpectedCharacter('-', self.position))
                }
            }
            _ if ch.is_ascii_digit() => self.read_number(),
            _ if ch.is_alphabetic() || ch == '_' => Ok(self.read_identifier()),
            _ => Err(Error::UnexpectedCharacter(ch, self.position)),
        }
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    fn skip_comments(&mut self) {
        if self.is_at_end() {
            return;
        }

        // Line comment: -- runs to end of line
        if self.current_char() == '-' && self.peek_char() == Some('-') {
            while !self.is_at_end() && self.current_char() != '\n' {
                self.advance();
            }
            self.skip_whitespace();
            self.skip_comments();
        }
    }

    fn read_string(&mut self) -> Result<Token> {
        let start_pos = self.position;
        self.advance(); // opening quote

        let mut value = String::new();
        while !self.is_at_end() {
            let ch = self.current_char();
            if ch == '"' {
                // Doubled quote is an escaped quote
                if self.peek_char() == Some('"') {
                    value.push('"');
                    self.advance();
                    self.advance();
                } else {
                    self.advance(); // closing quote
                    return Ok(Token::StringLiteral(value));
                }
            } else {
                value.push(ch);
                self.advance();
            }
        }

        Err(Error::UnterminatedString(start_pos))
    }

    fn read_number(&mut self) -> Result<Token> {
        let start_pos = self.position;
        let mut number = String::new();

        while !self.is_at_end() && self.current_char().is_ascii_digit() {
            number.push(self.current_char());
            self.advance();
        }

        number
            .parse::<i64>()
            .map(Token::IntegerLiteral)
            .map_err(|_| Error::InvalidNumber(start_pos))
    }

    fn read_identifier(&mut self) -> Token {
        let mut word = String::new();

        while !self.is_at_end() {
            let ch = self.current_char();
            if ch.is_alphanumeric() || ch == '_' {
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        Token::from_keyword(&word).unwrap_or(Token::Identifier(word))
    }

    fn current_char(&self) -> char {
        self.input[self.position]
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }
}
