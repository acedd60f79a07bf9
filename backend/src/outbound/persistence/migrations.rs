//! Embedded schema migrations applied at startup.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// Migrations from `backend/migrations`, compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Failures while applying embedded migrations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// The migration connection could not be opened.
    #[error("failed to connect for migrations: {message}")]
    Connect {
        /// Driver description of the failure.
        message: String,
    },
    /// A migration failed to apply.
    #[error("failed to apply migrations: {message}")]
    Apply {
        /// Driver description of the failure.
        message: String,
    },
    /// The blocking migration task did not complete.
    #[error("migration task aborted: {message}")]
    Aborted {
        /// Runtime description of the failure.
        message: String,
    },
}

/// Apply pending migrations on a dedicated blocking thread.
///
/// Returns the number of migrations applied.
pub async fn run_migrations(database_url: &str) -> Result<usize, MigrationError> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || apply_pending(&url))
        .await
        .map_err(|err| MigrationError::Aborted {
            message: err.to_string(),
        })?
}

fn apply_pending(database_url: &str) -> Result<usize, MigrationError> {
    let mut conn =
        PgConnection::establish(database_url).map_err(|err| MigrationError::Connect {
            message: err.to_string(),
        })?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?;
    info!(count = applied.len(), "applied pending migrations");
    Ok(applied.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::migration::MigrationSource;
    use diesel::pg::Pg;

    #[test]
    fn users_migration_is_embedded() {
        let migrations =
            MigrationSource::<Pg>::migrations(&MIGRATIONS).expect("embedded migrations load");
        let names: Vec<String> = migrations.iter().map(|m| m.name().to_string()).collect();
        assert_eq!(names, vec!["2024-03-01-000000_create_users".to_owned()]);
    }

    #[tokio::test]
    async fn unreachable_database_reports_connect_error() {
        let err = run_migrations("postgres://users@127.0.0.1:1/users")
            .await
            .expect_err("nothing listens on port 1");
        assert!(matches!(err, MigrationError::Connect { .. }));
    }
}
