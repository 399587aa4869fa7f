//! capture-proxy
//!
//! A transparent forwarding proxy that archives relayed traffic, built
//! with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌────────────────────────────────────────────────┐
//!                    │                 CAPTURE PROXY                   │
//!                    │                                                 │
//!  Client Request    │  ┌────────┐   ┌──────────┐   ┌──────────────┐  │
//!  ──────────────────┼─▶│  http  │──▶│ routing  │──▶│   capture    │  │
//!                    │  │ server │   │  target  │   │ transcripts  │  │
//!                    │  └────────┘   └──────────┘   └──────┬───────┘  │
//!                    │                                      │          │
//!                    │                                      ▼          │
//!                    │                              ┌──────────────┐  │        Target
//!                    │                              │   outbound   │◀─┼──────▶ Server
//!                    │                              │    client    │  │
//!                    │                              └──────┬───────┘  │
//!                    │                                      │          │
//!  Client Response   │  ┌────────┐   ┌──────────┐   ┌──────▼───────┐  │
//!  ◀─────────────────┼──│response│◀──│ storage  │◀──│   archive    │  │
//!                    │  │        │   │  upload  │   │   builder    │  │
//!                    │  └────────┘   └──────────┘   └──────────────┘  │
//!                    └────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use capture_proxy::config::{load_config, ProxyConfig};
use capture_proxy::observability::init_logging;
use capture_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "capture-proxy")]
#[command(about = "HTTP forwarding proxy that archives relayed traffic", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    listen: Option<String>,

    /// Override the archive storage root directory.
    #[arg(long)]
    storage_root: Option<PathBuf>,
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
    if let Some(root) = cli.storage_root {
        config.storage.root = Some(root);
    }

    init_logging(&config.observability.log_level);

    tracing::info!("capture-proxy v0.1.0 starting");

    match config.storage.resolve_root() {
        Some(root) => tracing::info!(root = %root.display(), "Archive storage configured"),
        None => tracing::warn!(
            "No storage root configured; requests will be refused until one is set"
        ),
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(address = %local_addr, "Listening for connections");

    let server = HttpServer::new(config);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
