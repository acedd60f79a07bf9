//! Users API entry-point: loads settings, prepares the store, and serves HTTP.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use users_api::inbound::http::health::HealthState;
use users_api::outbound::persistence::{DbPool, run_migrations};
use users_api::settings::ServerSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let pool_config = settings.pool_config().map_err(std::io::Error::other)?;

    if settings.skip_migrations {
        info!("skipping embedded migrations");
    } else {
        run_migrations(pool_config.database_url())
            .await
            .map_err(std::io::Error::other)?;
    }

    let pool = DbPool::new(pool_config)
        .await
        .map_err(|e| std::io::Error::other(e.into_message()))?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, ServerConfig::new(bind_addr, pool))?;
    info!(%bind_addr, "users API listening");
    server.await
}
