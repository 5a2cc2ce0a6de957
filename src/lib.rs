//! HTTP-to-gRPC translation bridge.
//!
//! Exposes a handful of REST endpoints and forwards each request to one call
//! on the authentication backend, relaying metadata, status and a JSON body.

pub mod bridge;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod rpc;
pub mod translate;

pub use bridge::Bridge;
pub use config::schema::BridgeConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
