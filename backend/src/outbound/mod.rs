//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed user repository using Diesel ORM.

pub mod persistence;
