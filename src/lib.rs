//! ShaleDB - a small remote in-memory table store
//!
//! This library provides the core components of the command engine:
//! - Binary frame decoding and response framing
//! - Script parsing (lexer, parser, tokens)
//! - The unified command model
//! - The table catalog (schemas, rows, coarse locking)
//! - Command execution
//! - TCP server
//!
//! Two independent command surfaces, 0x00-terminated binary frames and a
//! textual script dialect, decode into the same command type, which the
//! execution engine applies to a catalog shared across connections.

pub mod catalog;
pub mod command;
pub mod error;
pub mod executor;
pub mod protocol;
pub mod script;
pub mod server;

pub use command::Command;
pub use error::{Error, Result};
