//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → BridgeConfig (validated, immutable)
//!     → read once by the host at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the dispatch table is built from code,
//!   not from config, so there is nothing to hot-reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{BridgeConfig, LimitsConfig, ListenerConfig, ObservabilityConfig, RpcConfig};
