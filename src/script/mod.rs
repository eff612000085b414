//! Script dialect module
//!
//! This module contains the lexer and parser for the textual command
//! surface. Script text arrives over a connection one line at a time; each
//! statement decodes to one command.

pub mod lexer;
pub mod parser;
pub mod token;

pub use lexer::Lexer;
pub use parser::Parser;
pub use token::Token;
