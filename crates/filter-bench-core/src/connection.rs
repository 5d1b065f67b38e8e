// crates/filter-bench-core/src/connection.rs
// ============================================================================
// Module: Connection Provider
// Description: Builds Postgres clients from an explicit configuration record.
// Purpose: Hand each benchmark actor its own ready-to-use connection.
// Dependencies: postgres, serde
// ============================================================================

//! ## Overview
//! [`DatabaseConfig`] is resolved once by the caller and handed to a
//! [`PostgresConnectionProvider`]; nothing reads configuration lazily. The
//! provider opens a fresh client per call, so each component owns exactly one
//! connection and no connection is shared.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use postgres::Client;
use postgres::NoTls;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ConnectionError;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Connection settings for the benchmark and maintenance databases.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Server host name or address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Login role.
    pub user: String,
    /// Login password (empty for trust/peer auth).
    pub password: String,
    /// Benchmark database name (created and dropped per run).
    pub dbname: String,
    /// Database used for create/drop administration.
    pub maintenance_dbname: String,
    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Engine statement timeout in milliseconds (0 keeps the server default).
    pub statement_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            dbname: "filter_bench".to_string(),
            maintenance_dbname: "postgres".to_string(),
            connect_timeout_ms: 5_000,
            statement_timeout_ms: 0,
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("dbname", &self.dbname)
            .field("maintenance_dbname", &self.maintenance_dbname)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("statement_timeout_ms", &self.statement_timeout_ms)
            .finish()
    }
}

impl DatabaseConfig {
    /// Builds driver settings targeting `dbname`.
    fn pg_config(&self, dbname: &str) -> postgres::Config {
        let mut pg_config = postgres::Config::new();
        pg_config
            .host(&self.host)
            .port(self.port)
            .user(&self.user)
            .dbname(dbname)
            .connect_timeout(Duration::from_millis(self.connect_timeout_ms));
        if !self.password.is_empty() {
            pg_config.password(&self.password);
        }
        if self.statement_timeout_ms > 0 {
            let options = format!("-c statement_timeout={}", self.statement_timeout_ms);
            pg_config.options(&options);
        }
        pg_config
    }
}

// ============================================================================
// SECTION: Provider
// ============================================================================

/// Supplies dedicated connections to the benchmark engine.
pub trait ConnectionProvider {
    /// Name of the benchmark database.
    fn database_name(&self) -> &str;

    /// Opens a connection to the benchmark database.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`] when the connection fails.
    fn connect(&self) -> Result<Client, ConnectionError>;

    /// Opens a connection to the maintenance database.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`] when the connection fails.
    fn connect_maintenance(&self) -> Result<Client, ConnectionError>;
}

/// Plain-TCP Postgres connection provider.
#[derive(Debug, Clone)]
pub struct PostgresConnectionProvider {
    /// Resolved connection settings.
    config: DatabaseConfig,
}

impl PostgresConnectionProvider {
    /// Creates a provider for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::Config`] when required fields are empty.
    pub fn new(config: DatabaseConfig) -> Result<Self, ConnectionError> {
        if config.host.trim().is_empty() {
            return Err(ConnectionError::Config("database.host must be set".to_string()));
        }
        if config.user.trim().is_empty() {
            return Err(ConnectionError::Config("database.user must be set".to_string()));
        }
        if config.dbname == config.maintenance_dbname {
            return Err(ConnectionError::Config(
                "database.dbname must differ from database.maintenance_dbname".to_string(),
            ));
        }
        Ok(Self {
            config,
        })
    }

    /// Returns the connection settings.
    #[must_use]
    pub const fn config(&self) -> &DatabaseConfig {
        &self.config
    }
}

impl ConnectionProvider for PostgresConnectionProvider {
    fn database_name(&self) -> &str {
        &self.config.dbname
    }

    fn connect(&self) -> Result<Client, ConnectionError> {
        self.config
            .pg_config(&self.config.dbname)
            .connect(NoTls)
            .map_err(|err| ConnectionError::Connect(err.to_string()))
    }

    fn connect_maintenance(&self) -> Result<Client, ConnectionError> {
        self.config
            .pg_config(&self.config.maintenance_dbname)
            .connect(NoTls)
            .map_err(|err| ConnectionError::Connect(err.to_string()))
    }
}

#[cfg(test)]
mod tests;
