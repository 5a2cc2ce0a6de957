//! Endpoint dispatch table.
//!
//! # Responsibilities
//! - Store handlers keyed by normalized path, then method
//! - Resolve `(path, method)` to a handler, or to the 404 responder
//! - Serve routes that take one trailing identifier segment
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - One trailing `/` is insignificant, on registration and on lookup
//! - Methods match case-insensitively
//! - Lookup never errors; misses degrade to a fixed 404 responder

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::observability::{metrics, SharedLogger};

/// Methods a route may be registered for.
pub const ALLOWED_METHODS: [Method; 5] = [
    Method::POST,
    Method::GET,
    Method::PATCH,
    Method::PUT,
    Method::DELETE,
];

/// A request handler: one HTTP request in, one response out.
pub type Handler = Arc<dyn Fn(Request<Body>) -> BoxFuture<'static, Response> + Send + Sync>;

/// Wrap an async function as a [`Handler`].
pub fn handler<F, Fut>(f: F) -> Handler
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    Arc::new(move |req: Request<Body>| -> BoxFuture<'static, Response> { Box::pin(f(req)) })
}

/// Responder for unmapped routes: 404 with an empty body.
pub fn not_found() -> Handler {
    handler(|_req| async {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NOT_FOUND;
        response
    })
}

/// Errors raised while building a table.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("unsupported method '{method}' for endpoint '{path}'")]
    UnsupportedMethod { path: String, method: String },
}

/// A registration: endpoint, method, handler.
#[derive(Clone)]
pub struct Route {
    path: String,
    method: String,
    handler: Handler,
    identifier: bool,
}

impl Route {
    pub fn new(path: impl Into<String>, method: impl Into<String>, handler: Handler) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
            handler,
            identifier: false,
        }
    }

    /// Also match `path/{id}` for a single trailing segment.
    pub fn with_identifier(mut self) -> Self {
        self.identifier = true;
        self
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("method", &self.method)
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
struct Entry {
    handler: Handler,
    identifier: bool,
}

/// Collects routes for a [`DispatchTable`].
pub struct DispatchTableBuilder {
    logger: SharedLogger,
    routes: Vec<Route>,
}

impl DispatchTableBuilder {
    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    /// Build the table.
    ///
    /// A route whose method is outside [`ALLOWED_METHODS`] is logged and the
    /// whole build is rejected. Later routes for an existing key replace
    /// earlier ones.
    pub fn build(self) -> Result<DispatchTable, RoutingError> {
        let mut table = DispatchTable::empty(self.logger);
        for route in self.routes {
            let upper = route.method.to_ascii_uppercase();
            let method = match Method::from_bytes(upper.as_bytes()) {
                Ok(m) if ALLOWED_METHODS.contains(&m) => m,
                _ => {
                    table.logger.warning(&format!(
                        "unexpected method passed, rejecting route: {:?}",
                        route
                    ));
                    return Err(RoutingError::UnsupportedMethod {
                        path: route.path,
                        method: route.method,
                    });
                }
            };
            table.insert(&route.path, method, route.handler, route.identifier);
        }
        Ok(table)
    }
}

/// Immutable `path → method → handler` registry.
pub struct DispatchTable {
    endpoints: HashMap<String, HashMap<Method, Entry>>,
    logger: SharedLogger,
    not_found: Handler,
}

impl DispatchTable {
    pub fn builder(logger: SharedLogger) -> DispatchTableBuilder {
        DispatchTableBuilder {
            logger,
            routes: Vec::new(),
        }
    }

    fn empty(logger: SharedLogger) -> Self {
        Self {
            endpoints: HashMap::new(),
            logger,
            not_found: not_found(),
        }
    }

    /// Insert without method validation. Callers pass one of
    /// [`ALLOWED_METHODS`].
    fn insert(&mut self, path: &str, method: Method, handler: Handler, identifier: bool) {
        self.endpoints
            .entry(normalize(path).to_string())
            .or_default()
            .insert(method, Entry { handler, identifier });
    }

    /// Resolve a request target to its handler.
    pub fn resolve(&self, path: &str, method: &str) -> Handler {
        let path = normalize(path);
        let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes()).ok();

        if let Some(methods) = self.endpoints.get(path) {
            self.logger.info(&format!("found handler: {}", path));
            return match method.as_ref().and_then(|m| methods.get(m)) {
                Some(entry) => entry.handler.clone(),
                None => self.miss(&format!(
                    "not found handler for method: {} {}",
                    path,
                    method.as_ref().map(Method::as_str).unwrap_or("")
                )),
            };
        }

        if let Some(entry) = method.as_ref().and_then(|m| self.identifier_route(path, m)) {
            self.logger.info(&format!("found handler: {}", path));
            return entry.handler.clone();
        }

        self.miss(&format!("not found handler: {}", path))
    }

    /// Number of registered `(path, method)` keys.
    pub fn len(&self) -> usize {
        self.endpoints.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn identifier_route(&self, path: &str, method: &Method) -> Option<&Entry> {
        let (parent, segment) = path.rsplit_once('/')?;
        if parent.is_empty() || segment.is_empty() {
            return None;
        }
        self.endpoints
            .get(parent)?
            .get(method)
            .filter(|entry| entry.identifier)
    }

    fn miss(&self, message: &str) -> Handler {
        self.logger.error(message);
        metrics::record_route_miss();
        self.not_found.clone()
    }
}

/// Strip exactly one trailing separator.
pub fn normalize(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}
