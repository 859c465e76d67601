//! Minimal forwarding HTTP proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌──────────────────────────────────────────────┐
//!                   │               FORWARDING PROXY                │
//!                   │                                               │
//!   Client Request  │  ┌─────────┐   ┌──────────┐   ┌───────────┐  │
//!   ────────────────┼─▶│   net   │──▶│  relay   │──▶│  request  │  │
//!                   │  │listener │   │controller│   │parse/strip│  │
//!                   │  └─────────┘   └────┬─────┘   └─────┬─────┘  │
//!                   │                     │               │        │
//!                   │                     ▼               ▼        │
//!                   │               ┌──────────┐   ┌───────────┐   │
//!                   │               │ bounded  │   │  origin   │───┼──▶ Origin
//!   Client Response │               │  reader  │   │ resolver  │   │    Server
//!   ◀───────────────┼───────────────│ + stream │◀──│ + connect │◀──┼──
//!                   │               └──────────┘   └───────────┘   │
//!                   │                                               │
//!                   │  ┌─────────────────────────────────────────┐ │
//!                   │  │          Cross-Cutting Concerns          │ │
//!                   │  │  ┌────────┐ ┌─────────────┐ ┌─────────┐ │ │
//!                   │  │  │ config │ │observability│ │lifecycle│ │ │
//!                   │  │  └────────┘ └─────────────┘ └─────────┘ │ │
//!                   │  └─────────────────────────────────────────┘ │
//!                   └──────────────────────────────────────────────┘
//! ```
//!
//! One request per connection: the relay reads a single bounded request,
//! rewrites it into origin-form, connects to the resolved origin, relays
//! the response, logs the transaction, and closes both sockets.

use std::path::PathBuf;

use clap::Parser;

use forward_proxy::config::loader::{load_config, ConfigError};
use forward_proxy::config::validation::validate_config;
use forward_proxy::config::ProxyConfig;
use forward_proxy::lifecycle::{signals, Shutdown};
use forward_proxy::net::Listener;
use forward_proxy::observability::{logging, metrics};
use forward_proxy::RelayServer;

#[derive(Parser)]
#[command(name = "forward-proxy")]
#[command(about = "Minimal forwarding HTTP proxy", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen address (host:port).
    #[arg(short, long)]
    listen: Option<String>,

    /// Override the bounded-read buffer capacity in bytes.
    #[arg(short, long)]
    buffer_size: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(listen) = cli.listen {
        config.listener.bind_address = listen;
    }
    if let Some(size) = cli.buffer_size {
        config.relay.buffer_size = size;
    }

    // CLI overrides can invalidate a previously valid config.
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability);

    tracing::info!("forward-proxy v0.1.0 starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_connections = config.listener.max_connections,
        buffer_size = config.relay.buffer_size,
        error_page = %config.relay.error_page_path,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = Listener::bind(&config.listener).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        shutdown.trigger();
    });

    let server = RelayServer::new(config);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
