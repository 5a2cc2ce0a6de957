//! Composition root: client + logger in, one request entry point out.

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;

use crate::config::LimitsConfig;
use crate::observability::SharedLogger;
use crate::routing::{DispatchTable, RoutingError};
use crate::rpc::AuthService;
use crate::translate::TranslationHandlers;

/// The HTTP-to-RPC bridge.
///
/// Cheap to clone; every clone shares one dispatch table.
#[derive(Clone)]
pub struct Bridge {
    table: Arc<DispatchTable>,
    logger: SharedLogger,
}

impl Bridge {
    /// Wire the five translation handlers into a dispatch table.
    pub fn new(
        client: Arc<dyn AuthService>,
        logger: SharedLogger,
        limits: &LimitsConfig,
    ) -> Result<Self, RoutingError> {
        let handlers = Arc::new(TranslationHandlers::new(client, logger.clone(), limits));
        let table = DispatchTable::from_endpoints(logger.clone(), handlers.endpoints())?;
        Ok(Self {
            table: Arc::new(table),
            logger,
        })
    }

    /// Serve one request.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        self.logger.debug(&format!(
            "req path: {} {}",
            request.method(),
            request.uri()
        ));
        let handler = self
            .table
            .resolve(request.uri().path(), request.method().as_str());
        handler(request).await
    }

    /// Axum router that sends every request through [`Bridge::handle`].
    pub fn router(self) -> Router {
        Router::new().fallback(move |request: Request<Body>| {
            let bridge = self.clone();
            async move { bridge.handle(request).await }
        })
    }
}
