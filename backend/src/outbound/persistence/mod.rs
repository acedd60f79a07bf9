//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! - **Thin adapter**: [`DieselUserRepository`] only translates between
//!   Diesel rows and domain records.
//! - **Internal models**: row structs (`models.rs`) and the table definition
//!   (`schema.rs`) never leave this module.
//! - **Error classification**: [`db_error`] turns driver failures into
//!   structured, stable descriptions before they become port errors.
//!
//! # Example
//!
//! ```no_run
//! use users_api::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), users_api::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/users")).await?;
//! let repo = DieselUserRepository::new(pool);
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

pub mod db_error;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
