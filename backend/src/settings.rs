//! Server settings loaded via OrthoConfig.
//!
//! Values come from `USERS_API_*` environment variables, an optional
//! configuration file, and command-line flags, in increasing precedence.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Problems found while resolving settings into runtime values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// No database URL was supplied.
    #[error("USERS_API_DATABASE_URL must be set")]
    MissingDatabaseUrl,
    /// The bind address could not be parsed.
    #[error("invalid bind address {value:?}: {message}")]
    InvalidBindAddr {
        /// Supplied value.
        value: String,
        /// Parser description of the failure.
        message: String,
    },
}

/// Configuration for the HTTP server and its PostgreSQL store.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USERS_API")]
pub struct ServerSettings {
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Upper bound on pooled connections.
    pub pool_max_size: Option<u32>,
    /// Idle connections kept warm.
    pub pool_min_idle: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub pool_connection_timeout_secs: Option<u64>,
    /// Serve without applying embedded migrations first.
    #[ortho_config(default = false)]
    pub skip_migrations: bool,
}

impl ServerSettings {
    /// Return the database URL or fail when it is missing or blank.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Return the parsed bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| {
            SettingsError::InvalidBindAddr {
                value: raw.to_owned(),
                message: err.to_string(),
            }
        })
    }

    /// Build the pool configuration, leaving unset values at pool defaults.
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        let mut config = PoolConfig::new(self.database_url()?);
        if let Some(max_size) = self.pool_max_size {
            config = config.with_max_size(max_size);
        }
        if let Some(min_idle) = self.pool_min_idle {
            config = config.with_min_idle(Some(min_idle));
        }
        if let Some(secs) = self.pool_connection_timeout_secs {
            config = config.with_connection_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}
