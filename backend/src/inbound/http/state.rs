//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` so they depend on the user
//! service alone and stay testable without I/O. The repository is erased to a
//! trait object here; the binary decides which adapter backs it.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::UserRepository;
use crate::domain::{PasswordHasher, UserService};

/// User service over whichever repository the process wired in.
pub type DynUserService = UserService<dyn UserRepository>;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Account use cases.
    pub users: DynUserService,
}

impl HttpState {
    /// Bundle an already constructed service.
    pub fn new(users: DynUserService) -> Self {
        Self { users }
    }

    /// Build the service from a repository and a clock.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use mockable::DefaultClock;
    /// use users_api::domain::ports::FixtureUserRepository;
    /// use users_api::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::from_repository(Arc::new(FixtureUserRepository), Arc::new(DefaultClock));
    /// # let _ = state;
    /// ```
    pub fn from_repository(repo: Arc<dyn UserRepository>, clock: Arc<dyn Clock>) -> Self {
        Self::new(UserService::new(repo, clock, PasswordHasher))
    }
}
