//! Diesel table definitions for the users store.
//!
//! Kept in step with `backend/migrations` by hand; the migration is the
//! source of truth.

diesel::table! {
    /// Registered user accounts.
    users (id) {
        /// Store-assigned identifier (`BIGSERIAL`).
        id -> Int8,
        /// Given name, empty when not supplied.
        first_name -> Varchar,
        /// Family name, empty when not supplied.
        last_name -> Varchar,
        /// Normalised login email, unique via `users_email_key`.
        email -> Varchar,
        /// Creation instant.
        date_created -> Timestamptz,
        /// `active` or `inactive`.
        status -> Varchar,
        /// Hex SHA-256 credential digest.
        password -> Varchar,
    }
}
