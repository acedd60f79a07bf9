//! Users API handlers.
//!
//! ```text
//! POST   /users                          {"first_name":"Ann","email":"ann@x.com","password":"pw"}
//! GET    /users/{user_id}                X-Public: true selects the public view
//! PUT    /users/{user_id}                full update
//! PATCH  /users/{user_id}                partial update
//! DELETE /users/{user_id}
//! POST   /users/login                    {"email":"ann@x.com","password":"pw"}
//! GET    /internal/users/search?status=active
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, put, web};
use serde::Deserialize;
use serde_json::json;

use crate::domain::{
    Error, LoginRequest, UpdateMode, UserDraft, UserId, UserStatus, UserView, Visibility, project,
    project_all, render_all,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Request header selecting the public view when set to `true`.
pub const PUBLIC_VIEW_HEADER: &str = "X-Public";

/// Query string for `GET /internal/users/search`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// `active` or `inactive`.
    pub status: Option<String>,
}

fn visibility(request: &HttpRequest) -> Visibility {
    let is_public = request
        .headers()
        .get(PUBLIC_VIEW_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim().eq_ignore_ascii_case("true"));
    Visibility::from(is_public)
}

fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    raw.parse::<UserId>()
        .map_err(|err| Error::invalid_request(err.to_string()))
}

/// JSON extractor settings returning the domain error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _request| {
        Error::invalid_request(format!("invalid json body: {err}")).into()
    })
}

/// Query extractor settings returning the domain error envelope.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _request| {
        Error::invalid_request(format!("invalid query string: {err}")).into()
    })
}

/// Register every users route and its extractor settings.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use users_api::inbound::http::users::configure;
///
/// let app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(login)
        .service(create_user)
        .service(search_users)
        .service(get_user)
        .service(replace_user)
        .service(patch_user)
        .service(delete_user);
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/users",
    request_body = UserDraft,
    params(("X-Public" = Option<bool>, Header, description = "Return the public view")),
    responses(
        (status = 201, description = "User created", body = UserView),
        (status = 400, description = "Invalid or duplicate data", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    request: HttpRequest,
    payload: web::Json<UserDraft>,
) -> ApiResult<HttpResponse> {
    let user = state.users.create(payload.into_inner()).await?;
    let body = project(&user, visibility(&request)).to_json()?;
    Ok(HttpResponse::Created().json(body))
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/users/{user_id}",
    params(
        ("user_id" = i64, Path, description = "Numeric user id"),
        ("X-Public" = Option<bool>, Header, description = "Return the public view")
    ),
    responses(
        (status = 200, description = "User", body = UserView),
        (status = 400, description = "Non-numeric id", body = Error),
        (status = 404, description = "No such user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{user_id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    request: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path)?;
    let user = state.users.get(id).await?;
    Ok(HttpResponse::Ok().json(project(&user, visibility(&request)).to_json()?))
}

async fn update_user(
    state: &HttpState,
    request: &HttpRequest,
    raw_id: &str,
    draft: UserDraft,
    mode: UpdateMode,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(raw_id)?;
    let user = state.users.update(id, draft, mode).await?;
    Ok(HttpResponse::Ok().json(project(&user, visibility(request)).to_json()?))
}

/// Replace names and email; omitted names are cleared.
#[utoipa::path(
    put,
    path = "/users/{user_id}",
    request_body = UserDraft,
    params(
        ("user_id" = i64, Path, description = "Numeric user id"),
        ("X-Public" = Option<bool>, Header, description = "Return the public view")
    ),
    responses(
        (status = 200, description = "Updated user", body = UserView),
        (status = 400, description = "Invalid or duplicate data", body = Error),
        (status = 404, description = "No such user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "replaceUser"
)]
#[put("/users/{user_id}")]
pub async fn replace_user(
    state: web::Data<HttpState>,
    request: HttpRequest,
    path: web::Path<String>,
    payload: web::Json<UserDraft>,
) -> ApiResult<HttpResponse> {
    update_user(&state, &request, &path, payload.into_inner(), UpdateMode::Full).await
}

/// Change only the supplied, non-empty fields.
#[utoipa::path(
    patch,
    path = "/users/{user_id}",
    request_body = UserDraft,
    params(
        ("user_id" = i64, Path, description = "Numeric user id"),
        ("X-Public" = Option<bool>, Header, description = "Return the public view")
    ),
    responses(
        (status = 200, description = "Updated user", body = UserView),
        (status = 400, description = "Invalid or duplicate data", body = Error),
        (status = 404, description = "No such user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "patchUser"
)]
#[patch("/users/{user_id}")]
pub async fn patch_user(
    state: web::Data<HttpState>,
    request: HttpRequest,
    path: web::Path<String>,
    payload: web::Json<UserDraft>,
) -> ApiResult<HttpResponse> {
    update_user(&state, &request, &path, payload.into_inner(), UpdateMode::Partial).await
}

/// Remove a user.
#[utoipa::path(
    delete,
    path = "/users/{user_id}",
    params(("user_id" = i64, Path, description = "Numeric user id")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 400, description = "Non-numeric id", body = Error),
        (status = 404, description = "No such user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{user_id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path)?;
    state.users.delete(id).await?;
    Ok(HttpResponse::Ok().json(json!({ "status": "deleted" })))
}

/// List users by status, ordered by id.
#[utoipa::path(
    get,
    path = "/internal/users/search",
    params(
        SearchQuery,
        ("X-Public" = Option<bool>, Header, description = "Return public views")
    ),
    responses(
        (status = 200, description = "Matching users", body = [UserView]),
        (status = 400, description = "Unknown status", body = Error),
        (status = 404, description = "No user has this status", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "searchUsers"
)]
#[get("/internal/users/search")]
pub async fn search_users(
    state: web::Data<HttpState>,
    request: HttpRequest,
    query: web::Query<SearchQuery>,
) -> ApiResult<HttpResponse> {
    let status = query
        .status
        .as_deref()
        .unwrap_or_default()
        .parse::<UserStatus>()
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    let users = state.users.search(status).await?;
    let body = render_all(&project_all(&users, visibility(&request)))?;
    Ok(HttpResponse::Ok().json(body))
}

/// Check credentials and return the private view on success.
#[utoipa::path(
    post,
    path = "/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials match", body = UserView),
        (status = 400, description = "Malformed body", body = Error),
        (status = 404, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "login"
)]
#[post("/users/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let user = state.users.authenticate(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(project(&user, Visibility::Private).to_json()?))
}
