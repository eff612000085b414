//! ShaleDB - CLI Client
//!
//! A thin network client for the table store. Three ways in:
//!
//! - `repl` (default): interactive script statements
//! - `run <file>`: submit a script file
//! - `frame <key> <value>`: send one binary row-insert frame

use std::fs;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::net::TcpStream;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use shaledb::protocol::{encode_insert_frame, read_response, Status};

/// How long to wait for further response lines before considering a
/// submission fully answered. The server replies per command, so a client
/// that sent a whole script drains responses opportunistically.
const DRAIN_TIMEOUT: Duration = Duration::from_millis(300);

/// Client for the ShaleDB table store
#[derive(Parser, Debug)]
#[command(name = "shaledb-cli", version, about)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    server: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive script session
    Repl,
    /// Submit a script file and print each response
    Run {
        /// Script file to submit
        file: PathBuf,
    },
    /// Send one binary row-insert frame
    Frame {
        /// Key text
        key: String,
        /// Value text
        value: String,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command.unwrap_or(Commands::Repl) {
        Commands::Repl => run_repl(&args.server),
        Commands::Run { file } => run_script_file(&args.server, &file),
        Commands::Frame { key, value } => send_frame(&args.server, &key, &value),
    }
}

fn connect(addr: &str) -> anyhow::Result<TcpStream> {
    TcpStream::connect(addr).with_context(|| format!("connecting to {}", addr))
}

/// Read response lines until the server goes quiet. Returns how many of
/// them reported an error.
fn drain_responses(reader: &mut BufReader<TcpStream>) -> anyhow::Result<usize> {
    let mut errors = 0;
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {
                let text = line.trim_end();
                println!("{}", text);
                if let Ok(value) = serde_json::from_str::<serde_json::Value>(text) {
                    if value["status"] == "error" {
                        errors += 1;
                    }
                }
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(errors)
}

/// Main REPL loop
fn run_repl(addr: &str) -> anyhow::Result<()> {
    let stream = connect(addr)?;
    stream.set_read_timeout(Some(DRAIN_TIMEOUT))?;
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = stream;

    println!("Connected to shaledb at {}", addr);
    println!("Type statements ('--' starts a comment), '.quit' to exit");

    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline("shaledb> ") {
            Ok(line) => {
                let trimmed = line.trim();
                // Blank lines and comments produce no response; skip them
                // rather than wait out the drain timeout.
                if trimmed.is_empty() || trimmed.starts_with("--") {
                    continue;
                }
                if trimmed == ".quit" || trimmed == ".exit" {
                    break;
                }
                editor.add_history_entry(trimmed).ok();

                writer.write_all(trimmed.as_bytes())?;
                writer.write_all(b"\n")?;
                writer.flush()?;
                drain_responses(&mut reader)?;
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// Submit a script file in one shot
fn run_script_file(addr: &str, path: &Path) -> anyhow::Result<()> {
    let script =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    let stream = connect(addr)?;
    stream.set_read_timeout(Some(DRAIN_TIMEOUT))?;
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = stream;

    writer.write_all(script.as_bytes())?;
    if !script.ends_with('\n') {
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    let errors = drain_responses(&mut reader)?;
    if errors > 0 {
        anyhow::bail!("{} statement(s) failed", errors);
    }
    Ok(())
}

/// Send a single binary row-insert frame and print the response
fn send_frame(addr: &str, key: &str, value: &str) -> anyhow::Result<()> {
    let mut stream = connect(addr)?;
    stream.set_read_timeout(Some(Duration::from_secs(2)))?;

    stream.write_all(&encode_insert_frame(key, value))?;
    stream.flush()?;

    let response = read_response(&mut stream).context("reading response frame")?;
    match response.status {
        Status::Ok => println!("OK: {}", response.message),
        Status::Error => anyhow::bail!("server rejected frame: {}", response.message),
    }
    Ok(())
}
