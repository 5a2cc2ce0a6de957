//! Startup orchestration.
//!
//! # Responsibilities
//! - Connect to the RPC backend
//! - Build the bridge and its HTTP server
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: an unreachable backend at startup is fatal
//! - Listener binds last (traffic only when ready)
//! - The channel is dropped after the server drains

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::bridge::Bridge;
use crate::config::BridgeConfig;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::{metrics, SharedLogger};
use crate::routing::RoutingError;
use crate::rpc::{GrpcAuthClient, RpcError};

/// Errors that stop the process before or while serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("unable to connect to RPC backend: {0}")]
    Connect(#[from] RpcError),

    #[error("invalid route table: {0}")]
    Routing(#[from] RoutingError),

    #[error("unable to serve: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the bridge with `config` until a shutdown signal arrives.
pub async fn run(config: BridgeConfig, logger: SharedLogger) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    logger.info(&format!("host: {}", config.rpc.address));
    let client = match GrpcAuthClient::connect(&config.rpc).await {
        Ok(client) => Arc::new(client),
        Err(e) => {
            logger.fatal(&format!("did not connect: {}", e));
            return Err(e.into());
        }
    };

    let bridge = Bridge::new(client.clone(), logger.clone(), &config.limits)?;
    let server = HttpServer::new(bridge);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    drop(client);
    tracing::info!("RPC channel closed");
    Ok(())
}
