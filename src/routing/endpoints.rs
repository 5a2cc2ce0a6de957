//! The bridge's fixed endpoint set.

use crate::observability::SharedLogger;
use crate::routing::table::{DispatchTable, Handler, Route, RoutingError};

pub const USER_TOKEN_PATH: &str = "/v1/users/token";
pub const USERS_PATH: &str = "/v1/users";
pub const APPS_PATH: &str = "/v1/apps";
pub const APP_GROUPS_PATH: &str = "/v1/app-groups";

/// One handler per exposed operation.
///
/// Every field must be filled, so a table built from this struct always
/// serves all five operations.
#[derive(Clone)]
pub struct Endpoints {
    /// `POST /v1/users/token`
    pub issue_token: Handler,
    /// `POST /v1/users`
    pub create_user: Handler,
    /// `POST /v1/apps`
    pub create_app: Handler,
    /// `POST /v1/app-groups`
    pub create_app_group: Handler,
    /// `GET /v1/app-groups/{id}`
    pub get_app_group: Handler,
}

impl DispatchTable {
    /// Build the table serving [`Endpoints`].
    pub fn from_endpoints(
        logger: SharedLogger,
        endpoints: Endpoints,
    ) -> Result<Self, RoutingError> {
        DispatchTable::builder(logger)
            .route(Route::new(USER_TOKEN_PATH, "POST", endpoints.issue_token))
            .route(Route::new(USERS_PATH, "POST", endpoints.create_user))
            .route(Route::new(APPS_PATH, "POST", endpoints.create_app))
            .route(Route::new(APP_GROUPS_PATH, "POST", endpoints.create_app_group))
            .route(
                Route::new(APP_GROUPS_PATH, "GET", endpoints.get_app_group).with_identifier(),
            )
            .build()
    }
}
