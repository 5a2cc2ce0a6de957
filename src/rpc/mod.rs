//! RPC subsystem.
//!
//! # Data Flow
//! ```text
//! translation handler
//!     → client.rs (AuthService capability, RpcCall / RpcReply)
//!     → grpc.rs (tonic channel, unary call)
//!     → proto.rs (prost wire messages)
//!
//! metadata.rs converts HTTP headers ↔ call metadata on the way.
//! ```

pub mod client;
pub mod grpc;
pub mod metadata;
pub mod proto;

pub use client::{AuthService, RpcCall, RpcError, RpcReply, RpcResult};
pub use grpc::GrpcAuthClient;
