//! TCP Server for ShaleDB
//!
//! This module implements the TCP server that accepts remote clients and
//! routes their commands to the execution engine. A connection speaks one
//! of two surfaces, decided once by peeking at its first byte:
//!
//! - printable ASCII or whitespace: script mode, line-oriented statements
//!   answered with one JSON line per command
//! - anything else: binary mode, terminator-framed command frames answered
//!   with one response frame per command

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::executor::{ExecOutcome, ExecutionEngine};
use crate::protocol::{write_response, FrameDecoder, Response};
use crate::script::Parser;

/// Default server port
pub const DEFAULT_PORT: u16 = 8080;

/// Default table that binary row-insert frames apply to
pub const DEFAULT_FRAME_TABLE: &str = "kv";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Maximum concurrent connections
    pub max_connections: usize,
    /// Table that binary row operations target
    pub frame_table: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            max_connections: 100,
            frame_table: DEFAULT_FRAME_TABLE.to_string(),
        }
    }
}

impl ServerConfig {
    /// Create a new server config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host address
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the connection limit
    pub fn max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Set the table binary frames apply to
    pub fn frame_table(mut self, frame_table: impl Into<String>) -> Self {
        self.frame_table = frame_table.into();
        self
    }

    /// Get the bind address as a string
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// ShaleDB TCP Server
pub struct Server {
    config: ServerConfig,
    catalog: Arc<Catalog>,
}

impl Server {
    /// Create a new server with an empty catalog
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            catalog: Arc::new(Catalog::new()),
        }
    }

    /// Start the server and listen for connections.
    ///
    /// Each accepted connection runs on its own thread; all threads share
    /// the one catalog.
    pub fn start(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_address())?;
        info!("shaledb server listening on {}", self.config.bind_address());

        let active = Arc::new(AtomicUsize::new(0));

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    if active.load(Ordering::Acquire) >= self.config.max_connections {
                        warn!(
                            "refusing connection: limit of {} clients reached",
                            self.config.max_connections
                        );
                        continue;
                    }
                    active.fetch_add(1, Ordering::AcqRel);

                    let catalog = self.catalog.clone();
                    let frame_table = self.config.frame_table.clone();
                    let active = active.clone();
                    thread::spawn(move || {
                        if let Err(e) = handle_connection(stream, catalog, &frame_table) {
                            warn!("connection error: {}", e);
                        }
                        active.fetch_sub(1, Ordering::AcqRel);
                    });
                }
                Err(e) => {
                    warn!("failed to accept connection: {}", e);
                }
            }
        }

        Ok(())
    }
}

/// Command surface a connection speaks, decided once from its first byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectionMode {
    /// Terminator-framed command frames
    Binary,
    /// Script dialect text
    Script,
}

fn mode_for_first_byte(byte: u8) -> ConnectionMode {
    if byte.is_ascii_graphic() || byte.is_ascii_whitespace() {
        ConnectionMode::Script
    } else {
        ConnectionMode::Binary
    }
}

/// Peek the first byte without consuming it. Script statements always start
/// with a keyword letter, whitespace, or a comment dash, while binary frames
/// start with a small opcode byte. A future printable opcode would defeat
/// this heuristic; opcode 1 does not.
fn sniff_mode(stream: &TcpStream) -> Result<Option<ConnectionMode>> {
    let mut first = [0u8; 1];
    if stream.peek(&mut first)? == 0 {
        return Ok(None);
    }
    Ok(Some(mode_for_first_byte(first[0])))
}

/// Handle a client connection
fn handle_connection(stream: TcpStream, catalog: Arc<Catalog>, frame_table: &str) -> Result<()> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    let mode = match sniff_mode(&stream)? {
        Some(mode) => mode,
        None => {
            debug!("client {} closed before sending any bytes", peer_addr);
            return Ok(());
        }
    };
    debug!("client {} connected in {:?} mode", peer_addr, mode);

    let engine = ExecutionEngine::new(catalog);
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = stream;

    let result = match mode {
        ConnectionMode::Script => run_script_session(&mut reader, &mut writer, &engine),
        ConnectionMode::Binary => {
            run_binary_session(&mut reader, &mut writer, &engine, frame_table)
        }
    };

    if result.is_ok() {
        debug!("client {} disconnected", peer_addr);
    }
    result
}

/// One JSON response line in script mode
#[derive(Debug, Serialize)]
struct ScriptResponse<'a> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    affected_rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> ScriptResponse<'a> {
    fn ok(outcome: &'a ExecOutcome) -> Self {
        Self {
            status: "ok",
            affected_rows: Some(outcome.affected_rows),
            row: outcome.row,
            message: Some(&outcome.message),
            error: None,
        }
    }

    fn error(err: &Error) -> Self {
        Self {
            status: "error",
            affected_rows: None,
            row: None,
            message: None,
            error: Some(err.to_string()),
        }
    }
}

fn write_script_line<W: Write>(writer: &mut W, response: &ScriptResponse) -> Result<()> {
    let line =
        serde_json::to_string(response).map_err(|e| Error::Internal(e.to_string()))?;
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Run a script-mode session to completion.
///
/// Statements arrive line by line; each line may hold several semicolon-
/// separated statements. Every decoded command is answered with exactly one
/// JSON line, in decode order. A line that fails to parse gets one error
/// line and costs nothing else: later lines are processed normally.
pub fn run_script_session<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    engine: &ExecutionEngine,
) -> Result<()> {
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Ok(());
        }
        if line.trim().is_empty() {
            continue;
        }

        let commands = match Parser::new(&line).and_then(|mut p| p.parse_all()) {
            Ok(commands) => commands,
            Err(e) => {
                warn!("rejected script line: {}", e);
                write_script_line(writer, &ScriptResponse::error(&e))?;
                continue;
            }
        };

        for command in commands {
            trace!(table = command.table_name(), "executing script command");
            match engine.execute(command) {
                Ok(outcome) => write_script_line(writer, &ScriptResponse::ok(&outcome))?,
                Err(e) => {
                    warn!("command failed: {}", e);
                    write_script_line(writer, &ScriptResponse::error(&e))?;
                }
            }
        }
    }
}

/// Run a binary-mode session to completion.
///
/// Every decoded command is answered with exactly one response frame, in
/// decode order. A bad frame (unknown command, invalid text) is answered
/// and skipped; an unrecoverable decode error is answered and then closes
/// the session, because the stream can no longer be realigned.
pub fn run_binary_session<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    engine: &ExecutionEngine,
    frame_table: &str,
) -> Result<()> {
    let mut decoder = FrameDecoder::new(frame_table);
    let mut chunk = [0u8; 4096];

    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            // Peer closed; any partial frame is discarded with the decoder.
            return Ok(());
        }
        decoder.feed(&chunk[..n]);

        loop {
            match decoder.next_command() {
                Ok(Some(command)) => {
                    trace!(table = command.table_name(), "executing frame command");
                    let response = match engine.execute(command) {
                        Ok(outcome) => Response::ok(outcome.message),
                        Err(e) => {
                            warn!("command failed: {}", e);
                            Response::error(e.to_string())
                        }
                    };
                    write_response(writer, &response)?;
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("frame decode failed: {}", e);
                    write_response(writer, &Response::error(e.to_string()))?;
                    if !e.is_recoverable() {
                        return Err(e);
                    }
                }
            }
        }
    }
}
