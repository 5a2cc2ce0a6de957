//! HTTP ↔ RPC translation.
//!
//! # Data Flow
//! ```text
//! Request<Body>
//!     → extract.rs (form fields, JSON body, or path identifier)
//!     → handlers.rs (metadata, remote call, response assembly)
//!     → Response<Body>
//! ```

pub mod extract;
pub mod handlers;

pub use extract::TranslateError;
pub use handlers::{Operation, TranslationHandlers};
