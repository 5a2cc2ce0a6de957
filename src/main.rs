//! grpc-bridge (v1)
//!
//! REST front for the authentication backend, built with Tokio, Axum and tonic.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────┐
//!                     │                   GRPC BRIDGE                    │
//!   Client Request    │  ┌────────┐   ┌──────────────┐   ┌────────────┐  │
//!   ──────────────────┼─▶│  http  │──▶│   routing    │──▶│ translate  │  │
//!                     │  │ server │   │dispatch table│   │  handlers  │  │
//!                     │  └────────┘   └──────────────┘   └─────┬──────┘  │
//!                     │                                        │         │
//!   Client Response   │                                  ┌─────▼──────┐  │      Auth
//!   ◀─────────────────┼──────────────────────────────────│ rpc client │◀─┼────▶ Backend
//!                     │                                  └────────────┘  │
//!                     │  config · observability · lifecycle              │
//!                     └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use grpc_bridge::config::{load_config, BridgeConfig};
use grpc_bridge::lifecycle::startup;
use grpc_bridge::observability::{logging, TracingLogger};

#[derive(Parser)]
#[command(name = "grpc-bridge")]
#[command(about = "HTTP to gRPC translation bridge", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => BridgeConfig::default(),
    };

    logging::init(&config.observability);
    tracing::info!("grpc-bridge v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        rpc_address = %config.rpc.address,
        "Configuration loaded"
    );

    startup::run(config, TracingLogger::shared()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
