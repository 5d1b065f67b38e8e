// crates/filter-bench-config/src/config.rs
// ============================================================================
// Module: Filter Bench Configuration
// Description: Configuration loading and validation for benchmark runs.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: filter-bench-core, serde, time, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits
//! and validated before any database work starts. Every section is optional
//! and falls back to defaults that reproduce the reference benchmark: 5000
//! accounts, 500000 requests, a 50% filter set, and all three strategies.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashSet;
use std::env;
use std::fs;
use std::num::NonZeroU32;
use std::num::NonZeroUsize;
use std::path::Path;
use std::path::PathBuf;

use filter_bench_core::BenchmarkRunner;
use filter_bench_core::BulkLoader;
use filter_bench_core::DEFAULT_COPY_BATCH_SIZE;
use filter_bench_core::DatabaseConfig;
use filter_bench_core::SeedSpec;
use filter_bench_core::StatementLimit;
use filter_bench_core::StrategyKind;
use filter_bench_core::StrategyOptions;
use filter_bench_core::provisioner::validate_identifier;
use filter_bench_core::sql::DEFAULT_MAX_STATEMENT_BYTES;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use time::Date;
use time::macros::format_description;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "filter-bench.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "FILTER_BENCH_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum iterations per strategy.
pub(crate) const MAX_ITERATIONS: u32 = 10_000;

// ============================================================================
// SECTION: Root Config
// ============================================================================

/// Top-level benchmark configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterBenchConfig {
    /// Connection settings.
    pub database: DatabaseConfig,
    /// Synthetic data settings.
    pub seed: SeedConfig,
    /// Strategy execution settings.
    pub benchmark: BenchmarkConfig,
    /// Structured event output.
    pub logging: LoggingConfig,
}

impl FilterBenchConfig {
    /// Loads configuration using the default resolution rules.
    ///
    /// The path is taken from `path`, then `FILTER_BENCH_CONFIG`, then
    /// `filter-bench.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)?;
        self.seed.validate()?;
        self.benchmark.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Validates connection settings.
fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    if database.host.trim().is_empty() {
        return Err(ConfigError::Invalid("database.host must be non-empty".to_string()));
    }
    if database.user.trim().is_empty() {
        return Err(ConfigError::Invalid("database.user must be non-empty".to_string()));
    }
    if database.port == 0 {
        return Err(ConfigError::Invalid("database.port must be greater than zero".to_string()));
    }
    validate_identifier(&database.dbname).map_err(|_| {
        ConfigError::Invalid("database.dbname must match [a-z_][a-z0-9_]*".to_string())
    })?;
    if database.maintenance_dbname.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "database.maintenance_dbname must be non-empty".to_string(),
        ));
    }
    if database.dbname == database.maintenance_dbname {
        return Err(ConfigError::Invalid(
            "database.dbname must differ from database.maintenance_dbname".to_string(),
        ));
    }
    Ok(())
}

// ============================================================================
// SECTION: Seed Config
// ============================================================================

/// Synthetic data settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedConfig {
    /// Accounts `1..=num_accounts`.
    pub num_accounts: u32,
    /// Rows to insert.
    pub num_requests: u64,
    /// First request date (`YYYY-MM-DD`).
    pub start_date: String,
    /// Number of distinct dates.
    pub date_span_days: u32,
    /// Smallest total (inclusive).
    pub min_total: i32,
    /// Largest total (inclusive).
    pub max_total: i32,
    /// Rows per `INSERT` statement.
    pub batch_size: usize,
    /// Optional RNG seed for repeatable data and sampling.
    pub rng_seed: Option<u64>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        let spec = SeedSpec::default();
        Self {
            num_accounts: spec.num_accounts,
            num_requests: spec.num_requests,
            start_date: spec.start_date.to_string(),
            date_span_days: spec.date_span_days,
            min_total: spec.min_total,
            max_total: spec.max_total,
            batch_size: spec.batch_size.get(),
            rng_seed: spec.rng_seed,
        }
    }
}

impl SeedConfig {
    /// Converts to a validated [`SeedSpec`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a field is out of range.
    pub fn to_spec(&self) -> Result<SeedSpec, ConfigError> {
        let start_date =
            Date::parse(self.start_date.trim(), format_description!("[year]-[month]-[day]"))
                .map_err(|_| {
                    ConfigError::Invalid("seed.start_date must be YYYY-MM-DD".to_string())
                })?;
        let batch_size = NonZeroUsize::new(self.batch_size).ok_or_else(|| {
            ConfigError::Invalid("seed.batch_size must be greater than zero".to_string())
        })?;
        let spec = SeedSpec {
            num_accounts: self.num_accounts,
            num_requests: self.num_requests,
            start_date,
            date_span_days: self.date_span_days,
            min_total: self.min_total,
            max_total: self.max_total,
            batch_size,
            rng_seed: self.rng_seed,
        };
        spec.validate().map_err(|err| ConfigError::Invalid(err.to_string()))?;
        Ok(spec)
    }

    /// Validates the seed settings.
    fn validate(&self) -> Result<(), ConfigError> {
        self.to_spec().map(|_| ())
    }
}

// ============================================================================
// SECTION: Benchmark Config
// ============================================================================

/// Strategy execution settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchmarkConfig {
    /// Share of the id space placed in the filter set, `0..=100`.
    pub sample_percent: u8,
    /// Timed iterations per strategy.
    pub iterations: u32,
    /// Maintain the btree index on `requests.account_id`.
    pub index_account_id: bool,
    /// Ids per copy-in batch for the join strategy.
    pub copy_batch_size: usize,
    /// Statement-size limit for literal filters.
    pub max_statement_bytes: usize,
    /// Strategies in execution order.
    pub strategies: Vec<StrategyKind>,
    /// Leave the benchmark database in place after the run.
    pub keep_database: bool,
    /// Fail the run when strategies disagree on results.
    pub verify_equivalence: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            sample_percent: 50,
            iterations: 1,
            index_account_id: true,
            copy_batch_size: DEFAULT_COPY_BATCH_SIZE.get(),
            max_statement_bytes: DEFAULT_MAX_STATEMENT_BYTES,
            strategies: StrategyKind::ALL.to_vec(),
            keep_database: false,
            verify_equivalence: true,
        }
    }
}

impl BenchmarkConfig {
    /// Validates the benchmark settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_percent > 100 {
            return Err(ConfigError::Invalid(
                "benchmark.sample_percent must be within 0..=100".to_string(),
            ));
        }
        if self.iterations == 0 || self.iterations > MAX_ITERATIONS {
            return Err(ConfigError::Invalid(format!(
                "benchmark.iterations must be within 1..={MAX_ITERATIONS}"
            )));
        }
        if self.copy_batch_size == 0 {
            return Err(ConfigError::Invalid(
                "benchmark.copy_batch_size must be greater than zero".to_string(),
            ));
        }
        if self.max_statement_bytes == 0 || self.max_statement_bytes > DEFAULT_MAX_STATEMENT_BYTES
        {
            return Err(ConfigError::Invalid(format!(
                "benchmark.max_statement_bytes must be within 1..={DEFAULT_MAX_STATEMENT_BYTES}"
            )));
        }
        if self.strategies.is_empty() {
            return Err(ConfigError::Invalid(
                "benchmark.strategies must list at least one strategy".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for kind in &self.strategies {
            if !seen.insert(kind) {
                return Err(ConfigError::Invalid(format!(
                    "benchmark.strategies lists {kind} more than once"
                )));
            }
        }
        Ok(())
    }

    /// Builds the runner for the configured iteration count.
    #[must_use]
    pub fn runner(&self) -> BenchmarkRunner {
        BenchmarkRunner::new(NonZeroU32::new(self.iterations).unwrap_or(NonZeroU32::MIN))
    }

    /// Builds the shared strategy settings.
    #[must_use]
    pub fn strategy_options(&self) -> StrategyOptions {
        StrategyOptions {
            statement_limit: StatementLimit::new(self.max_statement_bytes),
            loader: BulkLoader::new(
                NonZeroUsize::new(self.copy_batch_size).unwrap_or(DEFAULT_COPY_BATCH_SIZE),
            ),
        }
    }
}

// ============================================================================
// SECTION: Logging Config
// ============================================================================

/// Destination for structured benchmark events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventLogMode {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// Append-only JSON lines file.
    File,
    /// Events discarded.
    Off,
}

/// Structured event output settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Event destination.
    pub events: EventLogMode,
    /// Event log path when `events = "file"`.
    pub path: Option<PathBuf>,
}

impl LoggingConfig {
    /// Validates the logging settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.events, &self.path) {
            (EventLogMode::File, None) => Err(ConfigError::Invalid(
                "logging.path is required when events = \"file\"".to_string(),
            )),
            (EventLogMode::File, Some(path)) => {
                validate_path_string("logging.path", &path.to_string_lossy())
            }
            (EventLogMode::Stderr | EventLogMode::Off, _) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the argument, env var, or default.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a configured path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
