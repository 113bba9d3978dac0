//! JSON-RPC caching reverse proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────────┐
//!                         │                  RPC CACHE PROXY                 │
//!                         │                                                  │
//!     Client Request      │  ┌─────────┐    ┌────────────┐    ┌──────────┐   │
//!     POST /{routing id}──┼─▶│  http   │───▶│  dispatch  │───▶│  cache   │   │
//!                         │  │ server  │    │            │◀───│  (TTL)   │   │
//!                         │  └─────────┘    └─────┬──────┘    └──────────┘   │
//!                         │       ▲               │ miss                     │
//!                         │       │               ▼                          │
//!                         │       │        ┌──────────────┐                  │
//!                         │       │        │load_balancer │                  │
//!                         │       │        │ id mod n     │                  │
//!                         │       │        └──────┬───────┘                  │
//!                         │       │               ▼                          │
//!     Client Response     │       │        ┌──────────────┐                  │
//!     ◀───────────────────┼───────┴────────│   upstream   │◀─────────────────┼──── RPC
//!                         │                │    client    │                  │     Backend
//!                         │                └──────────────┘                  │
//!                         └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;

use rpc_cache_proxy::config::{load_config, validate_config, ConfigError, ProxyConfig};
use rpc_cache_proxy::lifecycle::{build_server, shutdown_signal, Shutdown};
use rpc_cache_proxy::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "rpc-cache-proxy")]
#[command(about = "Caching reverse proxy for JSON-RPC backends", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override rpc_list_path.
    #[arg(long)]
    rpc_list: Option<String>,
}

// One logical thread serves every connection.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(rpc_list) = cli.rpc_list {
        config.rpc_list_path = rpc_list;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability)?;

    tracing::info!("rpc-cache-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        rpc_list_path = %config.rpc_list_path,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let server = build_server(&config)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
