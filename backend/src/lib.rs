//! Users API library modules.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
