//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Every failure is routed through the classifier in [`super::db_error`] and
//! leaves this module as a [`UserPersistenceError`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use tracing::{debug, error};

use crate::domain::ports::{UserPersistenceError, UserPredicate, UserRepository};
use crate::domain::{Email, NewUser, PasswordHash, User, UserId, UserStatus};

use super::db_error::{Classified, SqlState, classify};
use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.into_message())
}

/// Map Diesel errors to user persistence errors via the classifier.
fn map_diesel_error(error: DieselError) -> UserPersistenceError {
    match classify(&error) {
        Classified::Database(db) => match db.code() {
            SqlState::UniqueViolation | SqlState::NotNullViolation => {
                debug!(code = %db.code(), constraint = db.constraint(), "user rejected by store");
                UserPersistenceError::validation(db.message())
            }
            SqlState::IntegrityConstraintViolation => {
                error!(
                    code = %db.code(),
                    constraint = db.constraint(),
                    detail = db.detail(),
                    message = db.message(),
                    "unexpected integrity constraint violation"
                );
                UserPersistenceError::query(db.message())
            }
        },
        Classified::Unrecognised => {
            if matches!(
                error,
                DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
            ) {
                UserPersistenceError::connection(error.to_string())
            } else {
                UserPersistenceError::query(error.to_string())
            }
        }
        Classified::PassThrough(inner) => UserPersistenceError::query(inner.to_string()),
    }
}

fn not_found(id: UserId) -> UserPersistenceError {
    UserPersistenceError::not_found(format!("User with ID: {id} - not found"))
}

/// Convert a database row to a domain user.
///
/// An unknown stored status is a query failure; substituting a default would
/// be written back by the next update.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let status = row.status.parse::<UserStatus>().map_err(|_| {
        error!(
            value = %row.status,
            user_id = row.id,
            "unrecognised status value in users table"
        );
        UserPersistenceError::query(format!(
            "user {} has unrecognised status {:?}",
            row.id, row.status
        ))
    })?;

    Ok(User::new(
        UserId::new(row.id),
        NewUser {
            first_name: row.first_name,
            last_name: row.last_name,
            email: Email::from_stored(row.email),
            date_created: row.date_created,
            status,
            password_hash: PasswordHash::from_stored(row.password),
        },
    ))
}

/// Result of an update statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpdateResult {
    Success,
    ZeroRows,
}

impl From<usize> for UpdateResult {
    fn from(updated_rows: usize) -> Self {
        if updated_rows == 0 {
            Self::ZeroRows
        } else {
            Self::Success
        }
    }
}

fn non_empty(users: Vec<User>, message: &str) -> Result<Vec<User>, UserPersistenceError> {
    if users.is_empty() {
        Err(UserPersistenceError::not_found(message))
    } else {
        Ok(users)
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn save(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserRow {
            first_name: &user.first_name,
            last_name: &user.last_name,
            email: user.email.as_ref(),
            date_created: user.date_created,
            status: user.status.as_str(),
            password: user.password_hash.as_str(),
        };

        diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
            .and_then(row_to_user)
    }

    async fn get(&self, id: UserId) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map_or_else(|| Err(not_found(id)), row_to_user)
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = UserUpdate {
            first_name: user.first_name(),
            last_name: user.last_name(),
            email: user.email().as_ref(),
            status: user.status().as_str(),
        };

        let updated = diesel::update(users::table.find(user.id().get()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        match UpdateResult::from(updated) {
            UpdateResult::Success => Ok(()),
            UpdateResult::ZeroRows => Err(not_found(user.id())),
        }
    }

    async fn delete(&self, id: UserId) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(users::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        debug!(user_id = %id, deleted, "delete executed");
        Ok(())
    }

    async fn find_by(&self, predicate: &UserPredicate) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = match predicate {
            UserPredicate::Status(status) => users::table
                .filter(users::status.eq(status.as_str()))
                .order(users::id.asc())
                .select(UserRow::as_select())
                .load(&mut conn)
                .await,
            UserPredicate::Credentials {
                email,
                password_hash,
            } => users::table
                .filter(users::email.eq(email.as_ref()))
                .filter(users::password.eq(password_hash.as_str()))
                .order(users::id.asc())
                .select(UserRow::as_select())
                .load(&mut conn)
                .await,
        }
        .map_err(map_diesel_error)?;

        let users = rows
            .into_iter()
            .map(row_to_user)
            .collect::<Result<Vec<_>, _>>()?;
        non_empty(users, "no users matched")
    }
}
