//! Per-operation translation handlers.
//!
//! Every handler runs the same sequence:
//! extract parameters → copy headers into call metadata → one remote call →
//! relay metadata and status → JSON body.
//!
//! The body is serialized before the response is assembled, so a payload
//! that cannot be encoded yields a clean 500 rather than a 200 with no body.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::{header, HeaderValue, Request, StatusCode};
use axum::response::Response;
use serde::{Deserialize, Serialize};

use crate::config::LimitsConfig;
use crate::observability::{metrics, SharedLogger};
use crate::routing::{handler, Endpoints, APP_GROUPS_PATH};
use crate::rpc::metadata::{append_to_headers, from_headers};
use crate::rpc::proto::{AppGroupRequest, AppRequest, GetAppGroupRequest, UserRequest, UserTokenRequest};
use crate::rpc::{AuthService, RpcCall, RpcResult};
use crate::translate::extract::{json_body, path_identifier, FormValues, TranslateError};

/// Remote operation a handler invokes; names match the backend's methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    UserToken,
    CreateUser,
    CreateApp,
    CreateAppGroup,
    GetAppGroup,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::UserToken => "UserToken",
            Operation::CreateUser => "CreateUser",
            Operation::CreateApp => "CreateApp",
            Operation::CreateAppGroup => "CreateAppGroup",
            Operation::GetAppGroup => "GetAppGroup",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CreateUserBody {
    email: String,
    password: String,
    org_id: String,
    app_grp_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CreateAppBody {
    org_id: String,
    app_group_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CreateAppGroupBody {
    name: String,
    scopes: Vec<String>,
    org_id: String,
}

/// The five translation handlers, sharing one client and one logger.
#[derive(Clone)]
pub struct TranslationHandlers {
    client: Arc<dyn AuthService>,
    logger: SharedLogger,
    max_body_bytes: usize,
}

impl TranslationHandlers {
    pub fn new(client: Arc<dyn AuthService>, logger: SharedLogger, limits: &LimitsConfig) -> Self {
        Self {
            client,
            logger,
            max_body_bytes: limits.max_body_bytes,
        }
    }

    /// Wrap each operation as a routable [`Handler`](crate::routing::Handler).
    pub fn endpoints(self: Arc<Self>) -> Endpoints {
        let this = self.clone();
        let issue_token = handler(move |req| {
            let this = this.clone();
            async move { this.issue_token(req).await }
        });
        let this = self.clone();
        let create_user = handler(move |req| {
            let this = this.clone();
            async move { this.create_user(req).await }
        });
        let this = self.clone();
        let create_app = handler(move |req| {
            let this = this.clone();
            async move { this.create_app(req).await }
        });
        let this = self.clone();
        let create_app_group = handler(move |req| {
            let this = this.clone();
            async move { this.create_app_group(req).await }
        });
        let this = self;
        let get_app_group = handler(move |req| {
            let this = this.clone();
            async move { this.get_app_group(req).await }
        });

        Endpoints {
            issue_token,
            create_user,
            create_app,
            create_app_group,
            get_app_group,
        }
    }

    /// `POST /v1/users/token` with form fields `email`, `password`.
    pub async fn issue_token(&self, req: Request<Body>) -> Response {
        let start = Instant::now();
        let (parts, body) = req.into_parts();

        let form = FormValues::from_request(&parts, body, self.max_body_bytes).await;
        let message = UserTokenRequest {
            email: form.value("email"),
            password: form.value("password"),
        };

        let call = RpcCall::new(from_headers(&parts.headers), message);
        let result = self.client.user_token(call).await;
        self.relay(Operation::UserToken, result, start)
    }

    /// `POST /v1/users` with JSON `{email, password, org_id, app_grp_id}`.
    pub async fn create_user(&self, req: Request<Body>) -> Response {
        let start = Instant::now();
        let (parts, body) = req.into_parts();

        let input: CreateUserBody = match json_body(body, self.max_body_bytes).await {
            Ok(input) => input,
            Err(e) => return self.reject(Operation::CreateUser, e, start),
        };
        let message = UserRequest {
            email: input.email,
            password: input.password,
            org_id: input.org_id,
            app_group_id: input.app_grp_id,
        };

        let call = RpcCall::new(from_headers(&parts.headers), message);
        let result = self.client.create_user(call).await;
        self.relay(Operation::CreateUser, result, start)
    }

    /// `POST /v1/apps` with JSON `{org_id, app_group_id}`.
    pub async fn create_app(&self, req: Request<Body>) -> Response {
        let start = Instant::now();
        let (parts, body) = req.into_parts();

        let input: CreateAppBody = match json_body(body, self.max_body_bytes).await {
            Ok(input) => input,
            Err(e) => return self.reject(Operation::CreateApp, e, start),
        };
        let message = AppRequest {
            org_id: input.org_id,
            app_group_id: input.app_group_id,
        };

        let call = RpcCall::new(from_headers(&parts.headers), message);
        let result = self.client.create_app(call).await;
        self.relay(Operation::CreateApp, result, start)
    }

    /// `POST /v1/app-groups` with JSON `{name, scopes, org_id}`.
    pub async fn create_app_group(&self, req: Request<Body>) -> Response {
        let start = Instant::now();
        let (parts, body) = req.into_parts();

        let input: CreateAppGroupBody = match json_body(body, self.max_body_bytes).await {
            Ok(input) => input,
            Err(e) => return self.reject(Operation::CreateAppGroup, e, start),
        };
        let message = AppGroupRequest {
            name: input.name,
            scopes: input.scopes,
            org_id: input.org_id,
        };

        let call = RpcCall::new(from_headers(&parts.headers), message);
        let result = self.client.create_app_group(call).await;
        self.relay(Operation::CreateAppGroup, result, start)
    }

    /// `GET /v1/app-groups/{id}`.
    pub async fn get_app_group(&self, req: Request<Body>) -> Response {
        let start = Instant::now();

        let id = match path_identifier(req.uri().path(), APP_GROUPS_PATH) {
            Ok(id) => id,
            Err(e) => return self.reject(Operation::GetAppGroup, e, start),
        };
        let message = GetAppGroupRequest { id };

        let call = RpcCall::new(from_headers(req.headers()), message);
        let result = self.client.get_app_group(call).await;
        self.relay(Operation::GetAppGroup, result, start)
    }

    fn reject(&self, op: Operation, err: TranslateError, start: Instant) -> Response {
        self.logger.error(&err.to_string());
        self.finish(op, status_only(err.status()), start)
    }

    fn relay<T: Serialize>(&self, op: Operation, result: RpcResult<T>, start: Instant) -> Response {
        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                self.logger.error(&format!("error while making grpc call: {}", e));
                metrics::record_rpc_failure(op.as_str());
                return self.finish(op, status_only(StatusCode::INTERNAL_SERVER_ERROR), start);
            }
        };
        self.logger.info(&format!("call to {} successful", op));

        let body = match &reply.message {
            None => {
                self.logger.warning(&format!("grpc response for {} is nil", op));
                None
            }
            Some(message) => match serde_json::to_vec(message) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    self.logger.error(&format!("error while marshaling resp: {}", e));
                    return self.finish(op, status_only(StatusCode::INTERNAL_SERVER_ERROR), start);
                }
            },
        };

        let mut response = match body {
            Some(bytes) => {
                self.logger.info(&format!("writing response body from {}", op));
                Response::new(Body::from(bytes))
            }
            None => Response::new(Body::empty()),
        };
        let headers = response.headers_mut();
        append_to_headers(reply.metadata, headers);
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        self.finish(op, response, start)
    }

    fn finish(&self, op: Operation, response: Response, start: Instant) -> Response {
        metrics::record_request(op.as_str(), response.status().as_u16(), start);
        response
    }
}

fn status_only(status: StatusCode) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    response
}
