//! User data model.
//!
//! A record exists in two states: [`NewUser`] before the store has assigned an
//! identifier, and [`User`] once it has been persisted. Incoming payloads use
//! [`UserDraft`] and are normalised by the user service.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::PasswordHash;

/// Validation errors raised while building user values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The email was empty once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// The credential was empty once trimmed.
    #[error("password must not be empty")]
    EmptyPassword,
    /// The identifier is not a number.
    #[error("user id should be a number")]
    InvalidId,
    /// The status is not one of the known values.
    #[error("unknown user status '{value}'; expected active|inactive")]
    UnknownStatus {
        /// The rejected input.
        value: String,
    },
}

/// Store-assigned numeric user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }
}

/// Lifecycle state of an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// The account can be used.
    #[default]
    Active,
    /// The account has been switched off.
    Inactive,
}

impl UserStatus {
    /// Stored representation of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(UserValidationError::UnknownStatus {
                value: s.to_owned(),
            }),
        }
    }
}

/// Normalised email address: trimmed and lower-cased, never empty.
///
/// # Examples
/// ```
/// use users_api::domain::Email;
///
/// let email = Email::new(" ANN@X.com ").expect("valid email");
/// assert_eq!(email.as_ref(), "ann@x.com");
/// assert!(Email::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Normalise and validate raw input.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        Ok(Self(normalised))
    }

    /// Wrap a value read back from the store without re-validating it.
    pub(crate) fn from_stored(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user record that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Unique login email.
    pub email: Email,
    /// Creation instant.
    pub date_created: DateTime<Utc>,
    /// Initial status.
    pub status: UserStatus,
    /// Credential digest.
    pub password_hash: PasswordHash,
}

/// A persisted user.
///
/// ## Invariants
/// - `id`, `date_created`, and `password_hash` never change after creation;
///   only names, email, and status have setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    first_name: String,
    last_name: String,
    email: Email,
    date_created: DateTime<Utc>,
    status: UserStatus,
    password_hash: PasswordHash,
}

impl User {
    /// Attach a store-assigned identifier to an unsaved record.
    pub fn new(id: UserId, fields: NewUser) -> Self {
        let NewUser {
            first_name,
            last_name,
            email,
            date_created,
            status,
            password_hash,
        } = fields;
        Self {
            id,
            first_name,
            last_name,
            email,
            date_created,
            status,
            password_hash,
        }
    }

    /// Store-assigned identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Given name.
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Family name.
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Login email.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Creation instant.
    pub fn date_created(&self) -> DateTime<Utc> {
        self.date_created
    }

    /// Current status.
    pub fn status(&self) -> UserStatus {
        self.status
    }

    /// Credential digest. Never part of an external view.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Replace the given name.
    pub fn set_first_name(&mut self, value: impl Into<String>) {
        self.first_name = value.into();
    }

    /// Replace the family name.
    pub fn set_last_name(&mut self, value: impl Into<String>) {
        self.last_name = value.into();
    }

    /// Replace the login email.
    pub fn set_email(&mut self, value: Email) {
        self.email = value;
    }

    /// Replace the status.
    pub fn set_status(&mut self, value: UserStatus) {
        self.status = value;
    }
}

/// Incoming create or update payload.
///
/// Every field is optional so the same shape serves create, full update, and
/// partial update; the service decides what absence means.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub struct UserDraft {
    /// Given name.
    #[schema(example = "Ann")]
    pub first_name: Option<String>,
    /// Family name.
    #[schema(example = "Lee")]
    pub last_name: Option<String>,
    /// Login email; normalised before use.
    #[schema(example = "ann@x.com")]
    pub email: Option<String>,
    /// Raw credential; only read on create.
    pub password: Option<String>,
    /// Requested status.
    pub status: Option<UserStatus>,
}

/// Credential check payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Login email; normalised before lookup.
    #[schema(example = "ann@x.com")]
    pub email: String,
    /// Raw credential.
    pub password: String,
}

#[cfg(test)]
mod tests;
