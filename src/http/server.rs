//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router around the bridge entry point
//! - Wire up middleware (tracing, request ID)
//! - Bind server to listener
//! - Stop accepting and drain on shutdown

use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::bridge::Bridge;
use crate::http::request::{propagate_request_id, set_request_id};

/// HTTP server hosting the bridge.
pub struct HttpServer {
    router: axum::Router,
}

impl HttpServer {
    pub fn new(bridge: Bridge) -> Self {
        Self {
            router: Self::build_router(bridge),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(bridge: Bridge) -> axum::Router {
        bridge
            .router()
            .layer(propagate_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id())
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn into_router(self) -> axum::Router {
        self.router
    }
}
