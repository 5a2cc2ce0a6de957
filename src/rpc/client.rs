//! The remote capability set consumed by the translation handlers.

use thiserror::Error;
use tonic::metadata::MetadataMap;

use crate::rpc::proto::{
    AppGroupRequest, AppGroupResponse, AppRequest, AppResponse, GetAppGroupRequest,
    TokenResponse, UserRequest, UserResponse, UserTokenRequest,
};

/// Outgoing call: request message plus the metadata sent with it.
#[derive(Debug, Clone)]
pub struct RpcCall<T> {
    pub metadata: MetadataMap,
    pub message: T,
}

impl<T> RpcCall<T> {
    pub fn new(metadata: MetadataMap, message: T) -> Self {
        Self { metadata, message }
    }
}

/// Reply of a successful call.
///
/// Response metadata is kept apart from the payload. A `None` payload is a
/// successful call that produced nothing to relay.
#[derive(Debug, Clone)]
pub struct RpcReply<T> {
    pub metadata: MetadataMap,
    pub message: Option<T>,
}

impl<T> RpcReply<T> {
    pub fn new(metadata: MetadataMap, message: T) -> Self {
        Self {
            metadata,
            message: Some(message),
        }
    }

    pub fn empty(metadata: MetadataMap) -> Self {
        Self {
            metadata,
            message: None,
        }
    }
}

/// Errors from a remote call.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The backend answered with a non-OK status (includes deadline and
    /// cancellation reported by the transport).
    #[error("rpc status: {0}")]
    Status(#[from] tonic::Status),

    /// The channel could not carry the call.
    #[error("rpc transport error: {0}")]
    Transport(#[from] tonic::transport::Error),
}

/// Result type for remote calls.
pub type RpcResult<T> = Result<RpcReply<T>, RpcError>;

/// Operations of the authentication backend.
///
/// Each method performs exactly one round trip.
#[tonic::async_trait]
pub trait AuthService: Send + Sync + 'static {
    async fn user_token(&self, call: RpcCall<UserTokenRequest>) -> RpcResult<TokenResponse>;

    async fn create_user(&self, call: RpcCall<UserRequest>) -> RpcResult<UserResponse>;

    async fn create_app(&self, call: RpcCall<AppRequest>) -> RpcResult<AppResponse>;

    async fn create_app_group(&self, call: RpcCall<AppGroupRequest>)
        -> RpcResult<AppGroupResponse>;

    async fn get_app_group(&self, call: RpcCall<GetAppGroupRequest>)
        -> RpcResult<AppGroupResponse>;
}
