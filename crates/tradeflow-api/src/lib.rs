//! # Tradeflow API
//!
//! REST server for the Tradeflow supply-chain financing engine.
//!
//! ## Features
//!
//! - One endpoint per engine operation under `/api/v1`
//! - Engine errors mapped onto HTTP status codes with a stable error code
//! - Health and portfolio metrics endpoints
//! - Configuration via TOML file
//!
//! ## Usage
//!
//! ```ignore
//! use tradeflow_api::{Server, ServerConfig};
//!
//! let server = Server::new(config, engine);
//! server.start().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use tradeflow_engine::FinancingEngine;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};

/// The Tradeflow server.
pub struct Server {
    config: ServerConfig,
    engine: Arc<FinancingEngine>,
}

impl Server {
    /// Create a new server.
    pub fn new(config: ServerConfig, engine: Arc<FinancingEngine>) -> Self {
        Self { config, engine }
    }

    /// Build the router.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        routes::create_router(self.engine.clone())
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Start the server.
    pub async fn start(&self) -> Result<(), std::io::Error> {
        let ip = self.config.host.parse().unwrap_or_else(|_| {
            warn!(host = %self.config.host, "Unparseable host, binding all interfaces");
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        });
        let addr = SocketAddr::new(ip, self.config.port);

        info!("Starting Tradeflow server on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router()).await
    }
}
