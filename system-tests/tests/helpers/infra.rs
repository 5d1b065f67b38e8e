// system-tests/tests/helpers/infra.rs
// ============================================================================
// Module: System Test Infrastructure
// Description: Postgres fixture for filter benchmark system-tests.
// Purpose: Provide an isolated engine for provisioning and strategy checks.
// Dependencies: testcontainers, postgres
// ============================================================================

//! ## Overview
//! Starts a `postgres:15-alpine` container, or reuses an existing server when
//! `FILTER_BENCH_SYSTEM_PG_HOST` is set (with optional `_PORT`, `_USER` and
//! `_PASSWORD`). The container lives as long as the fixture.

use std::env;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use filter_bench_core::ConnectionProvider;
use filter_bench_core::DatabaseConfig;
use filter_bench_core::PostgresConnectionProvider;
use testcontainers::Container;
use testcontainers::GenericImage;
use testcontainers::ImageExt;
use testcontainers::core::IntoContainerPort;
use testcontainers::core::WaitFor;
use testcontainers::runners::SyncRunner;

/// Password used for the containerized server.
const CONTAINER_PASSWORD: &str = "filter-bench";
/// Upper bound on waiting for the server to accept connections.
const READY_TIMEOUT: Duration = Duration::from_secs(30);

/// Running Postgres server reachable from the tests.
pub struct PostgresFixture {
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Login role.
    pub user: String,
    /// Login password.
    pub password: String,
    /// Container kept alive for the fixture's lifetime, if one was started.
    _container: Option<Container<GenericImage>>,
}

impl PostgresFixture {
    /// Starts or attaches to a Postgres server.
    pub fn start() -> Result<Self, String> {
        if let Ok(host) = env::var("FILTER_BENCH_SYSTEM_PG_HOST") {
            let port: u16 = match env::var("FILTER_BENCH_SYSTEM_PG_PORT") {
                Ok(value) => value
                    .parse()
                    .map_err(|err| format!("invalid FILTER_BENCH_SYSTEM_PG_PORT: {err}"))?,
                Err(_) => 5432,
            };
            let user =
                env::var("FILTER_BENCH_SYSTEM_PG_USER").unwrap_or_else(|_| "postgres".to_string());
            let password = env::var("FILTER_BENCH_SYSTEM_PG_PASSWORD").unwrap_or_default();
            let fixture = Self {
                host,
                port,
                user,
                password,
                _container: None,
            };
            fixture.wait_until_ready()?;
            return Ok(fixture);
        }

        ensure_docker_available()?;
        let container = GenericImage::new("postgres", "15-alpine")
            .with_exposed_port(5432.tcp())
            .with_wait_for(WaitFor::message_on_stderr(
                "database system is ready to accept connections",
            ))
            .with_env_var("POSTGRES_PASSWORD", CONTAINER_PASSWORD)
            .with_env_var("POSTGRES_USER", "postgres")
            .start()
            .map_err(|err| format!("failed to start postgres container: {err}"))?;
        let port = container
            .get_host_port_ipv4(5432.tcp())
            .map_err(|err| format!("failed to resolve postgres port: {err}"))?;
        let fixture = Self {
            host: "127.0.0.1".to_string(),
            port,
            user: "postgres".to_string(),
            password: CONTAINER_PASSWORD.to_string(),
            _container: Some(container),
        };
        fixture.wait_until_ready()?;
        Ok(fixture)
    }

    /// Connection settings targeting benchmark database `dbname`.
    pub fn database_config(&self, dbname: &str) -> DatabaseConfig {
        DatabaseConfig {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            dbname: dbname.to_string(),
            maintenance_dbname: "postgres".to_string(),
            connect_timeout_ms: 2_000,
            statement_timeout_ms: 60_000,
        }
    }

    /// Provider for benchmark database `dbname`.
    pub fn provider(&self, dbname: &str) -> Result<PostgresConnectionProvider, String> {
        PostgresConnectionProvider::new(self.database_config(dbname)).map_err(|err| err.to_string())
    }

    /// Polls the maintenance database until it accepts connections.
    fn wait_until_ready(&self) -> Result<(), String> {
        let provider = self.provider("filter_bench_probe")?;
        let deadline = Instant::now() + READY_TIMEOUT;
        loop {
            match provider.connect_maintenance() {
                Ok(mut client) => match client.simple_query("SELECT 1") {
                    Ok(_) => return Ok(()),
                    Err(err) if Instant::now() >= deadline => {
                        return Err(format!("postgres not ready: {err}"));
                    }
                    Err(_) => {}
                },
                Err(err) if Instant::now() >= deadline => {
                    return Err(format!("postgres not ready: {err}"));
                }
                Err(_) => {}
            }
            thread::sleep(Duration::from_millis(250));
        }
    }
}

/// Fails fast when the Docker daemon is unreachable.
fn ensure_docker_available() -> Result<(), String> {
    let output = std::process::Command::new("docker")
        .arg("info")
        .output()
        .map_err(|err| format!("docker info failed: {err}"))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("docker info failed: {stderr}"));
    }
    Ok(())
}
