//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::body::BoxBody;
use tonic::codec::ProstCodec;
use tonic::codegen::{http, BoxFuture, Service, StdError};
use tonic::metadata::{MetadataMap, MetadataValue};
use tonic::server::{Grpc, NamedService, UnaryService};
use tower::ServiceExt;

use grpc_bridge::config::LimitsConfig;
use grpc_bridge::observability::{Logger, Severity};
use grpc_bridge::rpc::proto::{
    AppGroupRequest, AppGroupResponse, AppRequest, AppResponse, GetAppGroupRequest,
    TokenResponse, UserRequest, UserResponse, UserTokenRequest,
};
use grpc_bridge::rpc::{AuthService, RpcCall, RpcReply, RpcResult};
use grpc_bridge::translate::TranslationHandlers;
use grpc_bridge::{Bridge, HttpServer};

/// Scripted answer for one operation.
#[derive(Clone)]
enum Outcome<T> {
    Reply(MetadataMap, T),
    Empty(MetadataMap),
    Fail(tonic::Status),
}

/// Scripted operation that records every call it receives.
///
/// An operation without a scripted outcome panics when called, so tests
/// that expect no call fail loudly if one happens.
pub struct Script<Req, Resp> {
    outcome: Mutex<Option<Outcome<Resp>>>,
    calls: Mutex<Vec<RpcCall<Req>>>,
}

impl<Req: Clone, Resp: Clone> Script<Req, Resp> {
    fn new() -> Self {
        Self {
            outcome: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn returns(&self, resp: Resp) {
        self.returns_with_metadata(resp, MetadataMap::new());
    }

    pub fn returns_with_metadata(&self, resp: Resp, metadata: MetadataMap) {
        *self.outcome.lock().unwrap() = Some(Outcome::Reply(metadata, resp));
    }

    pub fn returns_empty(&self, metadata: MetadataMap) {
        *self.outcome.lock().unwrap() = Some(Outcome::Empty(metadata));
    }

    pub fn fails(&self, status: tonic::Status) {
        *self.outcome.lock().unwrap() = Some(Outcome::Fail(status));
    }

    pub fn calls(&self) -> Vec<RpcCall<Req>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn answer(&self, name: &str, call: RpcCall<Req>) -> RpcResult<Resp> {
        self.calls.lock().unwrap().push(call);
        let outcome = self.outcome.lock().unwrap().clone();
        match outcome {
            Some(Outcome::Reply(md, resp)) => Ok(RpcReply::new(md, resp)),
            Some(Outcome::Empty(md)) => Ok(RpcReply::empty(md)),
            Some(Outcome::Fail(status)) => Err(status.into()),
            None => panic!("unexpected call to {}", name),
        }
    }
}

/// Hand-written `AuthService` double.
pub struct MockAuth {
    pub user_token: Script<UserTokenRequest, TokenResponse>,
    pub create_user: Script<UserRequest, UserResponse>,
    pub create_app: Script<AppRequest, AppResponse>,
    pub create_app_group: Script<AppGroupRequest, AppGroupResponse>,
    pub get_app_group: Script<GetAppGroupRequest, AppGroupResponse>,
}

impl MockAuth {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            user_token: Script::new(),
            create_user: Script::new(),
            create_app: Script::new(),
            create_app_group: Script::new(),
            get_app_group: Script::new(),
        })
    }

    pub fn total_calls(&self) -> usize {
        self.user_token.call_count()
            + self.create_user.call_count()
            + self.create_app.call_count()
            + self.create_app_group.call_count()
            + self.get_app_group.call_count()
    }
}

#[tonic::async_trait]
impl AuthService for MockAuth {
    async fn user_token(&self, call: RpcCall<UserTokenRequest>) -> RpcResult<TokenResponse> {
        self.user_token.answer("UserToken", call)
    }

    async fn create_user(&self, call: RpcCall<UserRequest>) -> RpcResult<UserResponse> {
        self.create_user.answer("CreateUser", call)
    }

    async fn create_app(&self, call: RpcCall<AppRequest>) -> RpcResult<AppResponse> {
        self.create_app.answer("CreateApp", call)
    }

    async fn create_app_group(
        &self,
        call: RpcCall<AppGroupRequest>,
    ) -> RpcResult<AppGroupResponse> {
        self.create_app_group.answer("CreateAppGroup", call)
    }

    async fn get_app_group(
        &self,
        call: RpcCall<GetAppGroupRequest>,
    ) -> RpcResult<AppGroupResponse> {
        self.get_app_group.answer("GetAppGroup", call)
    }
}

/// A call as the gRPC backend received it.
#[derive(Debug, Clone)]
pub struct ReceivedCall {
    pub path: String,
    pub metadata: MetadataMap,
    pub message: UserTokenRequest,
}

/// gRPC backend that answers `UserToken` over a real socket.
///
/// Replies carry an `x-backend: auth-1` header. The email `denied@example.com`
/// is refused with `PERMISSION_DENIED`.
#[derive(Clone, Default)]
pub struct TokenBackend {
    received: Arc<Mutex<Vec<ReceivedCall>>>,
}

impl TokenBackend {
    pub fn received(&self) -> Vec<ReceivedCall> {
        self.received.lock().unwrap().clone()
    }
}

impl NamedService for TokenBackend {
    const NAME: &'static str = "auth.AuthService";
}

impl<B> Service<http::Request<B>> for TokenBackend
where
    B: tonic::codegen::Body + Send + 'static,
    B::Error: Into<StdError> + Send + 'static,
{
    type Response = http::Response<BoxBody>;
    type Error = Infallible;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<B>) -> Self::Future {
        let call = UserTokenCall {
            received: self.received.clone(),
            path: req.uri().path().to_string(),
        };
        Box::pin(async move {
            let codec = ProstCodec::<TokenResponse, UserTokenRequest>::default();
            let mut grpc = Grpc::new(codec);
            Ok(grpc.unary(call, req).await)
        })
    }
}

struct UserTokenCall {
    received: Arc<Mutex<Vec<ReceivedCall>>>,
    path: String,
}

impl UnaryService<UserTokenRequest> for UserTokenCall {
    type Response = TokenResponse;
    type Future = BoxFuture<tonic::Response<TokenResponse>, tonic::Status>;

    fn call(&mut self, request: tonic::Request<UserTokenRequest>) -> Self::Future {
        let metadata = request.metadata().clone();
        let message = request.into_inner();
        self.received.lock().unwrap().push(ReceivedCall {
            path: self.path.clone(),
            metadata,
            message: message.clone(),
        });

        Box::pin(async move {
            if message.email == "denied@example.com" {
                return Err(tonic::Status::permission_denied("account disabled"));
            }
            let mut response = tonic::Response::new(TokenResponse {
                access_token: format!("token-for-{}", message.email),
            });
            response
                .metadata_mut()
                .insert("x-backend", MetadataValue::from_static("auth-1"));
            Ok(response)
        })
    }
}

/// Serve `backend` on an ephemeral local port.
pub async fn start_grpc_backend(backend: TokenBackend) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        tonic::transport::Server::builder()
            .add_service(backend)
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    addr
}

/// Logger that keeps every line for later assertions.
#[derive(Default)]
pub struct RecordingLogger {
    lines: Mutex<Vec<(Severity, String)>>,
}

impl RecordingLogger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn lines(&self) -> Vec<(Severity, String)> {
        self.lines.lock().unwrap().clone()
    }

    pub fn contains(&self, severity: Severity, message: &str) -> bool {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .any(|(s, m)| *s == severity && m == message)
    }

    pub fn contains_prefix(&self, severity: Severity, prefix: &str) -> bool {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .any(|(s, m)| *s == severity && m.starts_with(prefix))
    }
}

impl Logger for RecordingLogger {
    fn log(&self, severity: Severity, message: &str) {
        self.lines.lock().unwrap().push((severity, message.to_string()));
    }
}

pub fn handlers(mock: &Arc<MockAuth>, logger: &Arc<RecordingLogger>) -> TranslationHandlers {
    TranslationHandlers::new(mock.clone(), logger.clone(), &LimitsConfig::default())
}

/// Fully layered router around a bridge backed by `mock`.
pub fn router(mock: &Arc<MockAuth>, logger: &Arc<RecordingLogger>) -> Router {
    let bridge = Bridge::new(mock.clone(), logger.clone(), &LimitsConfig::default()).unwrap();
    HttpServer::new(bridge).into_router()
}

/// Drive one request through `router`.
pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let response = router.oneshot(request).await.unwrap();
    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    (parts.status, parts.headers, bytes)
}

pub fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn metadata(pairs: &[(&'static str, &'static str)]) -> MetadataMap {
    let mut md = MetadataMap::new();
    for (key, value) in pairs {
        md.append(*key, value.parse().unwrap());
    }
    md
}
