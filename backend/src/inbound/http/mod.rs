//! HTTP inbound adapter exposing the users REST endpoints.

pub mod error;
pub mod health;
pub mod state;
pub mod users;

pub use error::ApiResult;
