//! ShaleDB server binary

use anyhow::Context;
use clap::Parser;
use shaledb::server::{Server, ServerConfig, DEFAULT_FRAME_TABLE, DEFAULT_PORT};
use tracing_subscriber::EnvFilter;

/// In-memory table store serving binary frames and the script dialect
#[derive(Parser, Debug)]
#[command(name = "shaledb-server", version, about)]
struct Args {
    /// Host address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Maximum concurrent connections
    #[arg(long, default_value_t = 100)]
    max_connections: usize,

    /// Table that binary row-insert frames apply to
    #[arg(long, default_value = DEFAULT_FRAME_TABLE)]
    frame_table: String,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shaledb=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let config = ServerConfig::new()
        .host(args.host)
        .port(args.port)
        .max_connections(args.max_connections)
        .frame_table(args.frame_table);

    let server = Server::new(config);
    server.start().context("server terminated")
}
