//! Internal Diesel row structs for the users table.
//!
//! These types never leave the persistence layer; the repository converts
//! them into domain records at the boundary.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::users;

/// Row read back from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_created: DateTime<Utc>,
    pub status: String,
    pub password: String,
}

/// Insertable user; the identifier is assigned by the store.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub date_created: DateTime<Utc>,
    pub status: &'a str,
    pub password: &'a str,
}

/// Mutable columns; the identifier and credential are never updated.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub status: &'a str,
}
