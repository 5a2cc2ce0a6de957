//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! dispatch table + handlers:
//!     → logging.rs (injected Logger, backed by tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{Logger, Severity, SharedLogger, TracingLogger};
