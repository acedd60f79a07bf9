//! External projections of a [`User`].
//!
//! Two shapes exist and the set is closed, so they form a tagged union rather
//! than an open trait. Adapters choose the [`Visibility`] explicitly; the
//! projector never infers it from the record. Neither shape carries the
//! credential digest.

use serde::Serialize;
use serde_json::Value;
use tracing::error;
use utoipa::ToSchema;

use super::{Error, User, UserStatus};

/// Timestamp layout used by the private view.
pub const DATE_CREATED_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Which external shape to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Names and status only.
    Public,
    /// Everything except the credential.
    Private,
}

impl From<bool> for Visibility {
    /// `true` selects the public view.
    fn from(is_public: bool) -> Self {
        if is_public {
            Self::Public
        } else {
            Self::Private
        }
    }
}

/// View safe to show to anyone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PublicUser {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Account status.
    pub status: UserStatus,
}

/// View for the account owner and internal callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PrivateUser {
    /// Store-assigned identifier.
    pub id: i64,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email.
    pub email: String,
    /// Creation instant, formatted as `YYYY-MM-DDTHH:MM:SSZ`.
    #[schema(example = "2024-03-01T12:30:00Z")]
    pub date_created: String,
    /// Account status.
    pub status: UserStatus,
}

/// One projected user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum UserView {
    /// Public projection.
    Public(PublicUser),
    /// Private projection.
    Private(PrivateUser),
}

impl UserView {
    /// Serialise the view for an adapter payload.
    ///
    /// Fails with an internal error instead of producing a partial payload.
    pub fn to_json(&self) -> Result<Value, Error> {
        serde_json::to_value(self).map_err(|err| {
            error!(error = %err, "failed to serialise user view");
            Error::internal("failed to render user")
        })
    }
}

/// Project one user into the requested shape.
///
/// # Examples
/// ```
/// use users_api::domain::{project, UserView, Visibility};
/// # use users_api::domain::{Email, NewUser, PasswordHasher, User, UserId, UserStatus};
/// # let user = User::new(UserId::new(1), NewUser {
/// #     first_name: "Ann".into(),
/// #     last_name: "Lee".into(),
/// #     email: Email::new("ann@x.com").unwrap(),
/// #     date_created: chrono::Utc::now(),
/// #     status: UserStatus::Active,
/// #     password_hash: PasswordHasher.hash("pw"),
/// # });
///
/// let view = project(&user, Visibility::Public);
/// assert!(matches!(view, UserView::Public(_)));
/// ```
pub fn project(user: &User, visibility: Visibility) -> UserView {
    match visibility {
        Visibility::Public => UserView::Public(PublicUser {
            first_name: user.first_name().to_owned(),
            last_name: user.last_name().to_owned(),
            status: user.status(),
        }),
        Visibility::Private => UserView::Private(PrivateUser {
            id: user.id().get(),
            first_name: user.first_name().to_owned(),
            last_name: user.last_name().to_owned(),
            email: user.email().as_ref().to_owned(),
            date_created: user.date_created().format(DATE_CREATED_FORMAT).to_string(),
            status: user.status(),
        }),
    }
}

/// Project a sequence, preserving order and applying one visibility to all.
pub fn project_all(users: &[User], visibility: Visibility) -> Vec<UserView> {
    users.iter().map(|user| project(user, visibility)).collect()
}

/// Serialise a projected sequence, failing as a whole if any element fails.
pub fn render_all(views: &[UserView]) -> Result<Value, Error> {
    views
        .iter()
        .map(UserView::to_json)
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}
