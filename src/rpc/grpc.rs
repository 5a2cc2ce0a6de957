//! tonic transport for `AuthService`.
//!
//! # Responsibilities
//! - Open the channel to the backend once at startup
//! - Issue unary calls on `/auth.AuthService/*` with the prost codec
//! - Keep hop-by-hop headers out of metadata in both directions
//!
//! # Design Decisions
//! - One `Channel` shared by all requests; cloning it is a handle copy
//! - No retries here; a failed call is reported once
//! - Deadlines come from the channel configuration, not from handlers

use std::time::Duration;

use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, Endpoint};

use crate::config::RpcConfig;
use crate::rpc::client::{AuthService, RpcCall, RpcError, RpcReply, RpcResult};
use crate::rpc::metadata::strip_hop_headers;
use crate::rpc::proto::{
    AppGroupRequest, AppGroupResponse, AppRequest, AppResponse, GetAppGroupRequest,
    TokenResponse, UserRequest, UserResponse, UserTokenRequest,
};

const USER_TOKEN: &str = "/auth.AuthService/UserToken";
const CREATE_USER: &str = "/auth.AuthService/CreateUser";
const CREATE_APP: &str = "/auth.AuthService/CreateApp";
const CREATE_APP_GROUP: &str = "/auth.AuthService/CreateAppGroup";
const GET_APP_GROUP: &str = "/auth.AuthService/GetAppGroup";

/// gRPC client for the authentication backend.
#[derive(Debug, Clone)]
pub struct GrpcAuthClient {
    inner: Grpc<Channel>,
}

impl GrpcAuthClient {
    /// Connect to the backend described by `config`.
    ///
    /// Fails if the address is malformed or the first connection attempt
    /// does not complete within the connect timeout.
    pub async fn connect(config: &RpcConfig) -> Result<Self, RpcError> {
        let mut endpoint = Endpoint::from_shared(config.address.clone())?
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        if let Some(secs) = config.request_timeout_secs {
            endpoint = endpoint.timeout(Duration::from_secs(secs));
        }

        let channel = endpoint.connect().await?;
        tracing::info!(address = %config.address, "Connected to RPC backend");
        Ok(Self::new(channel))
    }

    pub fn new(channel: Channel) -> Self {
        Self {
            inner: Grpc::new(channel),
        }
    }

    async fn unary<Req, Resp>(&self, call: RpcCall<Req>, path: &'static str) -> RpcResult<Resp>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        let mut grpc = self.inner.clone();
        grpc.ready().await?;

        let mut request = tonic::Request::new(call.message);
        *request.metadata_mut() = strip_hop_headers(call.metadata);

        let codec = ProstCodec::<Req, Resp>::default();
        let response = grpc
            .unary(request, PathAndQuery::from_static(path), codec)
            .await?;

        let (metadata, message, _) = response.into_parts();
        Ok(RpcReply::new(strip_hop_headers(metadata), message))
    }
}

#[tonic::async_trait]
impl AuthService for GrpcAuthClient {
    async fn user_token(&self, call: RpcCall<UserTokenRequest>) -> RpcResult<TokenResponse> {
        self.unary(call, USER_TOKEN).await
    }

    async fn create_user(&self, call: RpcCall<UserRequest>) -> RpcResult<UserResponse> {
        self.unary(call, CREATE_USER).await
    }

    async fn create_app(&self, call: RpcCall<AppRequest>) -> RpcResult<AppResponse> {
        self.unary(call, CREATE_APP).await
    }

    async fn create_app_group(
        &self,
        call: RpcCall<AppGroupRequest>,
    ) -> RpcResult<AppGroupResponse> {
        self.unary(call, CREATE_APP_GROUP).await
    }

    async fn get_app_group(
        &self,
        call: RpcCall<GetAppGroupRequest>,
    ) -> RpcResult<AppGroupResponse> {
        self.unary(call, GET_APP_GROUP).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_rejects_malformed_address() {
        let config = RpcConfig {
            address: "not a uri".to_string(),
            ..RpcConfig::default()
        };
        let err = GrpcAuthClient::connect(&config).await.unwrap_err();
        assert!(matches!(err, RpcError::Transport(_)));
    }

    #[tokio::test]
    async fn test_connect_fails_without_backend() {
        let config = RpcConfig {
            address: "http://127.0.0.1:1".to_string(),
            connect_timeout_secs: 1,
            request_timeout_secs: None,
        };
        assert!(GrpcAuthClient::connect(&config).await.is_err());
    }
}
