//! segment-router
//!
//! Serves an ordered table of path routes built from parser combinators.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────┐
//!                       │                SEGMENT ROUTER                │
//!                       │                                              │
//!   Client Request      │  ┌─────────┐   ┌────────────┐   ┌─────────┐  │
//!   ────────────────────┼─▶│  http   │──▶│ dispatcher │──▶│  route  │  │
//!                       │  │ server  │   │ (ordered)  │   │ parsers │  │
//!                       │  └─────────┘   └─────┬──────┘   └─────────┘  │
//!                       │                      │                       │
//!   Client Response     │                      ▼                       │
//!   ◀───────────────────┼──── JSON params ◀── handler   or   404       │
//!                       │                                              │
//!                       │  config (TOML, watch) · observability ·      │
//!                       │  lifecycle (startup/shutdown)                │
//!                       └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use segment_router::lifecycle::{startup, StartupOptions};

#[derive(Parser)]
#[command(name = "segment-router")]
#[command(about = "Serve an ordered table of parser-combinator path routes", long_about = None)]
struct Cli {
    /// Route file (TOML).
    #[arg(short, long, default_value = "routes.toml")]
    config: PathBuf,

    /// Port to listen on, overriding the configured bind address.
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Reload routes when the route file changes.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    startup::run(StartupOptions {
        config_path: cli.config,
        port: cli.port,
        watch: cli.watch,
    })
    .await
}
