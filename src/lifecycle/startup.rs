//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize logging and metrics
//! - Compile the route table and bind the listener
//! - Run until a shutdown signal arrives
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener binds last (traffic only when routes are compiled)

use std::error::Error;
use std::net::SocketAddr;
use std::path::PathBuf;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::config::{load_config, ConfigWatcher, RouterConfig};
use crate::http::HttpServer;
use crate::lifecycle::{shutdown_signal, Shutdown};
use crate::observability::{init_logging, init_metrics};

/// Options supplied on the command line.
#[derive(Debug, Clone)]
pub struct StartupOptions {
    /// Route file to load.
    pub config_path: PathBuf,
    /// Overrides the port of `listener.bind_address`.
    pub port: Option<u16>,
    /// Reload the route table when the route file changes.
    pub watch: bool,
}

/// Replace the port of `bind_address`.
pub fn override_port(bind_address: &str, port: u16) -> Result<String, std::net::AddrParseError> {
    let mut addr: SocketAddr = bind_address.parse()?;
    addr.set_port(port);
    Ok(addr.to_string())
}

/// Load the route file and apply command-line overrides.
pub fn prepare_config(options: &StartupOptions) -> Result<RouterConfig, Box<dyn Error + Send + Sync>> {
    let mut config = load_config(&options.config_path)?;
    if let Some(port) = options.port {
        config.listener.bind_address = override_port(&config.listener.bind_address, port)?;
    }
    Ok(config)
}

/// Start the router and serve until SIGINT/SIGTERM.
pub async fn run(options: StartupOptions) -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = prepare_config(&options)?;
    init_logging(&config.observability)?;

    tracing::info!("segment-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config = ?options.config_path,
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        init_metrics(addr)?;
    }

    let server = HttpServer::new(config.clone())?;

    let (_watcher, config_updates) = if options.watch {
        let (watcher, updates) = ConfigWatcher::new(&options.config_path);
        (Some(watcher.run()?), updates)
    } else {
        let (_, updates) = mpsc::unbounded_channel();
        (None, updates)
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!("listening at {}", listener.local_addr()?);

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_shutdown.trigger();
    });

    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
