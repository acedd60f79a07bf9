//! Domain primitives, ports, and services.
//!
//! Purpose: hold every business rule of the users API behind ports so that
//! inbound adapters (HTTP) and outbound adapters (Diesel) stay thin.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic error payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User / NewUser (from `user`): persisted and unsaved user records.
//! - UserView / Visibility (from `view`): external projections.
//! - UserService (from `user_service`): the account use cases.

pub mod error;
pub mod password;
pub mod ports;
pub mod user;
pub mod user_service;
pub mod view;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::password::{PasswordHash, PasswordHasher};
pub use self::user::{
    Email, LoginRequest, NewUser, User, UserDraft, UserId, UserStatus, UserValidationError,
};
pub use self::user_service::{UpdateMode, UserService};
pub use self::view::{
    DATE_CREATED_FORMAT, PrivateUser, PublicUser, UserView, Visibility, project, project_all,
    render_all,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use users_api::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<u32> {
///     Err(Error::not_found("nope"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
