//! Embedded PostgreSQL provisioning for integration tests.
//!
//! A template database is migrated once per migrations hash; each test then
//! clones it, so suites start from the same schema without re-running DDL.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use pg_embedded_setup_unpriv::test_support::{hash_directory, shared_cluster_handle};
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use postgres::{Client, NoTls};
use users_api::outbound::persistence::run_migrations;

use super::format_postgres_error;

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
static DATABASE_COUNTER: AtomicUsize = AtomicUsize::new(0);

const TEMPLATE_NAME_PREFIX: &str = "users_api_template";
const PROVISION_RETRIES: usize = 5;
const PROVISION_RETRY_DELAY: Duration = Duration::from_millis(500);

fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

fn template_database_name() -> Result<String, String> {
    let hash = hash_directory(migrations_dir()).map_err(|err| format!("hash migrations: {err}"))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

fn new_test_database_name() -> String {
    let sequence = DATABASE_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("test_{}_{sequence}", std::process::id())
}

/// Apply the crate's embedded migrations to `url`.
///
/// Uses the same entry point the server calls at startup, on a throwaway
/// runtime because template creation happens outside any test runtime.
pub fn migrate_schema(url: &str) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("migration runtime: {err}"))?;
    runtime
        .block_on(run_migrations(url))
        .map(|_| ())
        .map_err(|err| err.to_string())
}

fn ensure_template_database(cluster: &ClusterHandle) -> Result<String, String> {
    let template_name = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template_name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(template_name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        let url = cluster.connection().database_url(&template_name);
        migrate_schema(&url)?;
    }

    Ok(template_name)
}

fn provision_attempt(cluster: &ClusterHandle, attempt: usize) -> Result<TemporaryDatabase, String> {
    let template_name = ensure_template_database(cluster)
        .map_err(|err| format!("attempt {attempt}/{PROVISION_RETRIES}: {err}"))?;
    cluster
        .temporary_database_from_template(new_test_database_name().as_str(), template_name.as_str())
        .map_err(|err| format!("clone template: attempt {attempt}/{PROVISION_RETRIES}: {err:?}"))
}

/// Provision a fresh, migrated database on the shared embedded cluster.
pub fn provision_template_database() -> Result<TemporaryDatabase, String> {
    let cluster = shared_cluster_handle().map_err(|err| format!("shared cluster: {err:?}"))?;

    let mut last_error = String::from("no provisioning attempt ran");
    for attempt in 1..=PROVISION_RETRIES {
        match provision_attempt(cluster, attempt) {
            Ok(database) => return Ok(database),
            Err(error) => last_error = error,
        }
        if attempt < PROVISION_RETRIES {
            std::thread::sleep(PROVISION_RETRY_DELAY);
        }
    }
    Err(last_error)
}

/// Run raw SQL outside Diesel, bypassing the adapter's typed statements.
pub fn execute_batch(url: &str, sql: &str) -> Result<(), String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(sql)
        .map_err(|err| format_postgres_error(&err))
}

/// Drop the `users` table to simulate schema loss.
pub fn drop_users_table(url: &str) -> Result<(), String> {
    execute_batch(url, "DROP TABLE IF EXISTS users;")
}
