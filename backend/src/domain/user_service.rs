//! User account use cases.
//!
//! The service owns every business rule: input normalisation, credential
//! hashing, update merging, and the mapping from persistence failures into
//! the three-way [`Error`] taxonomy. Adapters only pick a view and a status
//! code.

use std::sync::Arc;

use mockable::Clock;
use tracing::{error, warn};

use crate::domain::ports::{UserPersistenceError, UserPredicate, UserRepository};
use crate::domain::{
    Email, Error, LoginRequest, NewUser, PasswordHasher, User, UserDraft, UserId, UserStatus,
    UserValidationError,
};

/// How an update payload is merged into the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// Names and email are replaced; omitted names become empty.
    Full,
    /// Only fields present and non-empty in the payload are replaced.
    Partial,
}

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Orchestrates validation, persistence, and error mapping for users.
pub struct UserService<R: ?Sized> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
    hasher: PasswordHasher,
}

impl<R: ?Sized> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            clock: Arc::clone(&self.clock),
            hasher: self.hasher,
        }
    }
}

impl<R: ?Sized> UserService<R> {
    /// Create a service over a repository, a clock, and a hasher.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// use users_api::domain::ports::FixtureUserRepository;
    /// use users_api::domain::{PasswordHasher, UserService};
    ///
    /// let service = UserService::new(
    ///     Arc::new(FixtureUserRepository),
    ///     Arc::new(DefaultClock),
    ///     PasswordHasher,
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>, hasher: PasswordHasher) -> Self {
        Self {
            repo,
            clock,
            hasher,
        }
    }
}

impl<R> UserService<R>
where
    R: UserRepository + ?Sized,
{
    /// Register a new user.
    #[tracing::instrument(skip(self, draft))]
    pub async fn create(&self, draft: UserDraft) -> Result<User, Error> {
        let email = Email::new(draft.email.unwrap_or_default()).map_err(validation_error)?;
        let password = draft.password.unwrap_or_default();
        if password.trim().is_empty() {
            return Err(validation_error(UserValidationError::EmptyPassword));
        }

        let new_user = NewUser {
            first_name: trimmed(draft.first_name),
            last_name: trimmed(draft.last_name),
            email,
            date_created: self.clock.utc(),
            status: UserStatus::Active,
            password_hash: self.hasher.hash(&password),
        };

        self.repo
            .save(&new_user)
            .await
            .map_err(map_persistence_error)
    }

    /// Fetch a user by identifier.
    #[tracing::instrument(skip(self), fields(user_id = %id))]
    pub async fn get(&self, id: UserId) -> Result<User, Error> {
        self.repo.get(id).await.map_err(map_persistence_error)
    }

    /// Merge a payload into an existing user and persist the result.
    #[tracing::instrument(skip(self, draft), fields(user_id = %id))]
    pub async fn update(&self, id: UserId, draft: UserDraft, mode: UpdateMode) -> Result<User, Error> {
        let mut current = self.get(id).await?;
        merge(&mut current, draft, mode)?;
        self.repo
            .update(&current)
            .await
            .map_err(map_persistence_error)?;
        Ok(current)
    }

    /// Remove an existing user.
    #[tracing::instrument(skip(self), fields(user_id = %id))]
    pub async fn delete(&self, id: UserId) -> Result<(), Error> {
        let current = self.get(id).await?;
        self.repo
            .delete(current.id())
            .await
            .map_err(map_persistence_error)
    }

    /// List users with the given status, ordered by identifier.
    ///
    /// No match is a not-found error rather than an empty list.
    #[tracing::instrument(skip(self), fields(status = %status))]
    pub async fn search(&self, status: UserStatus) -> Result<Vec<User>, Error> {
        let no_match = || Error::not_found(format!("no users with status {status}"));
        match self.repo.find_by(&UserPredicate::Status(status)).await {
            Ok(users) if users.is_empty() => Err(no_match()),
            Ok(users) => Ok(users),
            Err(UserPersistenceError::NotFound { .. }) => Err(no_match()),
            Err(other) => Err(map_persistence_error(other)),
        }
    }

    /// Check a credential pair and return the matching user.
    ///
    /// An unknown email and a wrong password fail identically.
    #[tracing::instrument(skip(self, request))]
    pub async fn authenticate(&self, request: LoginRequest) -> Result<User, Error> {
        let Ok(email) = Email::new(&request.email) else {
            return Err(Error::not_found(INVALID_CREDENTIALS));
        };
        let predicate = UserPredicate::Credentials {
            email,
            password_hash: self.hasher.hash(&request.password),
        };

        match self.repo.find_by(&predicate).await {
            Ok(users) => users
                .into_iter()
                .next()
                .ok_or_else(|| Error::not_found(INVALID_CREDENTIALS)),
            Err(UserPersistenceError::NotFound { .. }) => Err(Error::not_found(INVALID_CREDENTIALS)),
            Err(other) => Err(map_persistence_error(other)),
        }
    }
}

fn merge(user: &mut User, draft: UserDraft, mode: UpdateMode) -> Result<(), Error> {
    match mode {
        UpdateMode::Full => {
            let email = Email::new(draft.email.unwrap_or_default()).map_err(validation_error)?;
            user.set_first_name(trimmed(draft.first_name));
            user.set_last_name(trimmed(draft.last_name));
            user.set_email(email);
        }
        UpdateMode::Partial => {
            if let Some(first_name) = supplied(draft.first_name) {
                user.set_first_name(first_name);
            }
            if let Some(last_name) = supplied(draft.last_name) {
                user.set_last_name(last_name);
            }
            if let Some(email) = supplied(draft.email) {
                user.set_email(Email::new(email).map_err(validation_error)?);
            }
        }
    }
    if let Some(status) = draft.status {
        user.set_status(status);
    }
    Ok(())
}

fn trimmed(value: Option<String>) -> String {
    value.map(|raw| raw.trim().to_owned()).unwrap_or_default()
}

fn supplied(value: Option<String>) -> Option<String> {
    let value = trimmed(value);
    (!value.is_empty()).then_some(value)
}

fn validation_error(err: UserValidationError) -> Error {
    Error::invalid_request(err.to_string())
}

/// Map a store failure into the domain taxonomy.
///
/// Validation and not-found messages are safe to show; connection and query
/// failures are logged and replaced by a generic message.
pub(crate) fn map_persistence_error(err: UserPersistenceError) -> Error {
    match err {
        UserPersistenceError::Validation { message } => Error::invalid_request(message),
        UserPersistenceError::NotFound { message } => Error::not_found(message),
        UserPersistenceError::Connection { message } => {
            warn!(error = %message, "user store connection failed");
            Error::internal("user store unavailable")
        }
        UserPersistenceError::Query { message } => {
            error!(error = %message, "user store query failed");
            Error::internal("user store error")
        }
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
