//! Axum setup for the static host
//!
//! - Permissive CORS (any origin)
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use axum::Router;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::{ServerError, ServerResult};
use crate::routes;
use crate::state::HostState;

/// Static host command-line arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "college-admin-server", version, about = "Static host for the college admin panel")]
pub struct ServerArgs {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Bind address
    #[arg(short, long, default_value = "0.0.0.0")]
    pub bind: String,

    /// Directory holding index.html and any other static files
    #[arg(long, env = "STATIC_DIR", default_value = "public")]
    pub static_dir: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl ServerArgs {
    pub fn to_config(&self) -> ServerResult<ServerConfig> {
        let ip: IpAddr = self.bind.parse().map_err(|source| ServerError::BindAddr {
            addr: self.bind.clone(),
            source,
        })?;
        Ok(ServerConfig {
            bind_addr: SocketAddr::new(ip, self.port),
            static_dir: self.static_dir.clone(),
        })
    }
}

/// Resolved server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            static_dir: PathBuf::from("public"),
        }
    }
}

/// Build the router: `/`, `/health`, then the static directory
pub fn build_router(config: &ServerConfig) -> Router {
    let state = HostState::new(config.static_dir.clone());

    Router::new()
        .merge(routes::index::router())
        .merge(routes::health::router())
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl+C or SIGTERM
pub async fn run_server(config: ServerConfig) -> ServerResult<()> {
    let app = build_router(&config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    let local = listener.local_addr()?;
    info!(
        addr = %local,
        static_dir = %config.static_dir.display(),
        "College Admin Panel server started"
    );
    info!("Admin panel: http://localhost:{}", local.port());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
