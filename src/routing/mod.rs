//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, method)
//!     → table.rs (normalize path, uppercase method, lookup)
//!     → Return: matched Handler or the 404 responder
//!
//! Table construction (at startup):
//!     Endpoints { five handlers }
//!     → endpoints.rs (fixed paths and methods)
//!     → Freeze as immutable DispatchTable
//! ```
//!
//! # Design Decisions
//! - Tables built at startup, immutable at runtime
//! - Exact-match paths; one identifier segment only where a route asks for it
//! - Deterministic: same input always resolves to the same handler

pub mod endpoints;
pub mod table;

pub use endpoints::{Endpoints, APPS_PATH, APP_GROUPS_PATH, USERS_PATH, USER_TOKEN_PATH};
pub use table::{handler, not_found, DispatchTable, Handler, Route, RoutingError};
