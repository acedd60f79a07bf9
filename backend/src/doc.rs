//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every users endpoint, the health checks, and the
//! payload and view schemas. Swagger UI serves it in debug builds.

use utoipa::OpenApi;

use crate::domain::{
    Error, ErrorCode, LoginRequest, PrivateUser, PublicUser, UserDraft, UserStatus, UserView,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Users API",
        description = "Create, read, update, delete, search and authenticate user accounts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::replace_user,
        crate::inbound::http::users::patch_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::users::search_users,
        crate::inbound::http::users::login,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::health::ping,
    ),
    components(schemas(
        Error,
        ErrorCode,
        UserDraft,
        LoginRequest,
        PublicUser,
        PrivateUser,
        UserView,
        UserStatus
    )),
    tags(
        (name = "users", description = "User account operations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
