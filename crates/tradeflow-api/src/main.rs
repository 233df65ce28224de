//! Tradeflow server entry point.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tradeflow_api::{Server, ServerConfig};
use tradeflow_config::StorageBackend;
use tradeflow_engine::FinancingEngineBuilder;
use tradeflow_storage::{InMemoryStorage, RedbStorage, StorageAdapter};

/// Tradeflow supply-chain financing server.
#[derive(Parser, Debug)]
#[command(name = "tradeflow-api-server", version, about)]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = "config/tradeflow.toml")]
    config: PathBuf,

    /// Override the configured host
    #[arg(long)]
    host: Option<String>,

    /// Override the configured port
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable debug logging (ignored when RUST_LOG is set)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging
    let default_filter = if args.verbose {
        "debug,tower_http=debug"
    } else {
        "info,tradeflow=debug"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Tradeflow Server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = if args.config.exists() {
        info!("Loading configuration from {}", args.config.display());
        ServerConfig::from_file(&args.config)?
    } else {
        info!("Using default configuration");
        ServerConfig::default()
    };
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    // Create storage
    let storage: Arc<dyn StorageAdapter> = match config.engine.storage.backend {
        StorageBackend::Memory => Arc::new(InMemoryStorage::new()),
        StorageBackend::Redb => {
            let path = Path::new(&config.engine.storage.path);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            Arc::new(RedbStorage::open(path)?)
        }
    };
    info!(backend = storage.backend_name(), "Storage ready");

    // Build engine
    let engine = FinancingEngineBuilder::new()
        .with_config(config.engine.clone())
        .with_storage(storage)
        .build()?;

    // Start server
    let server = Server::new(config, Arc::new(engine));
    server.start().await?;

    Ok(())
}
