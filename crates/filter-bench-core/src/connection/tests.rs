// crates/filter-bench-core/src/connection/tests.rs
// ============================================================================
// Module: Connection Provider Unit Tests
// Description: Unit tests for connection settings without a live database.
// Purpose: Validate defaults, redaction, and provider preconditions.
// ============================================================================

#![allow(
    clippy::expect_used,
    clippy::use_debug,
    reason = "Unit tests use expect and debug formatting for assertions."
)]

use super::ConnectionProvider;
use super::DatabaseConfig;
use super::PostgresConnectionProvider;
use crate::error::ConnectionError;

#[test]
fn database_config_default_targets_local_server() {
    let config = DatabaseConfig::default();
    assert_eq!(config.host, "localhost");
    assert_eq!(config.port, 5432);
    assert_eq!(config.maintenance_dbname, "postgres");
    assert_ne!(config.dbname, config.maintenance_dbname);
}

#[test]
fn database_config_debug_redacts_password() {
    let config = DatabaseConfig {
        password: "hunter2".to_string(),
        ..DatabaseConfig::default()
    };
    let rendered = format!("{config:?}");
    assert!(!rendered.contains("hunter2"));
    assert!(rendered.contains("<redacted>"));
}

#[test]
fn provider_rejects_benchmarking_the_maintenance_database() {
    let config = DatabaseConfig {
        dbname: "postgres".to_string(),
        ..DatabaseConfig::default()
    };
    let result = PostgresConnectionProvider::new(config);
    assert!(matches!(result, Err(ConnectionError::Config(_))));
}

#[test]
fn provider_rejects_empty_host() {
    let config = DatabaseConfig {
        host: "  ".to_string(),
        ..DatabaseConfig::default()
    };
    assert!(PostgresConnectionProvider::new(config).is_err());
}

#[test]
fn provider_reports_database_name() {
    let provider = PostgresConnectionProvider::new(DatabaseConfig::default()).expect("provider");
    assert_eq!(provider.database_name(), "filter_bench");
}

#[test]
fn provider_connect_to_closed_port_fails() {
    let config = DatabaseConfig {
        host: "127.0.0.1".to_string(),
        port: 1,
        connect_timeout_ms: 200,
        ..DatabaseConfig::default()
    };
    let provider = PostgresConnectionProvider::new(config).expect("provider");
    assert!(matches!(provider.connect(), Err(ConnectionError::Connect(_))));
}
