//! Port abstraction for user persistence adapters and their errors.
//!
//! Adapters normalise every store failure into [`UserPersistenceError`]
//! before returning, so the service never sees driver types.

use async_trait::async_trait;

use crate::domain::{Email, NewUser, PasswordHash, User, UserId, UserStatus};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// The store rejected the data (duplicate or blank required column).
        Validation { message: String } => "{message}",
        /// No row matched the request.
        NotFound { message: String } => "{message}",
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// Lookup criteria for [`UserRepository::find_by`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserPredicate {
    /// Every user with the given status.
    Status(UserStatus),
    /// The user whose email and credential digest both match.
    Credentials {
        /// Normalised email.
        email: Email,
        /// Digest produced by the same hasher used at creation.
        password_hash: PasswordHash,
    },
}

/// Store capability set required by the user service.
///
/// # Connection scope
///
/// Implementations acquire a connection per call and release it on every
/// exit path. No connection outlives a single operation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, returning it with the store-assigned id.
    ///
    /// A duplicate email fails with [`UserPersistenceError::Validation`].
    async fn save(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier, failing with
    /// [`UserPersistenceError::NotFound`] when absent.
    async fn get(&self, id: UserId) -> Result<User, UserPersistenceError>;

    /// Persist names, email, and status for an existing user.
    ///
    /// The identifier and credential are never written. Zero matching rows
    /// fail with [`UserPersistenceError::NotFound`].
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Remove a user. Deleting an absent identifier succeeds.
    async fn delete(&self, id: UserId) -> Result<(), UserPersistenceError>;

    /// Return matching users ordered by identifier, failing with
    /// [`UserPersistenceError::NotFound`] when nothing matches.
    async fn find_by(&self, predicate: &UserPredicate) -> Result<Vec<User>, UserPersistenceError>;
}

/// Fixture implementation for wiring without a database.
///
/// Lookups always miss and writes always succeed; `save` assigns id `1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn save(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        Ok(User::new(UserId::new(1), user.clone()))
    }

    async fn get(&self, id: UserId) -> Result<User, UserPersistenceError> {
        Err(UserPersistenceError::not_found(format!(
            "User with ID: {id} - not found"
        )))
    }

    async fn update(&self, _user: &User) -> Result<(), UserPersistenceError> {
        Ok(())
    }

    async fn delete(&self, _id: UserId) -> Result<(), UserPersistenceError> {
        Ok(())
    }

    async fn find_by(
        &self,
        _predicate: &UserPredicate,
    ) -> Result<Vec<User>, UserPersistenceError> {
        Err(UserPersistenceError::not_found("no users matched"))
    }
}
