// crates/filter-bench-cli/src/bench.rs
// ============================================================================
// Module: Benchmark Session
// Description: End-to-end benchmark run over an ephemeral database.
// Purpose: Wire config, provisioning, seeding, sampling, and the runner.
// Dependencies: filter-bench-config, filter-bench-core, thiserror
// ============================================================================

//! ## Overview
//! [`run_benchmark`] performs one full run with one connection per actor:
//! the maintenance connection owned by [`EphemeralDatabase`], a seeding
//! connection that prepares and fills the fact table, and a query connection
//! handed to the runner. Both benchmark-database connections are closed
//! before the database is dropped. Provisioning failures abort the run;
//! strategy failures end up in the report.

// ============================================================================
// SECTION: Imports
// ============================================================================

use filter_bench_config::ConfigError;
use filter_bench_config::EventLogMode;
use filter_bench_config::FilterBenchConfig;
use filter_bench_config::LoggingConfig;
use filter_bench_core::BenchmarkReport;
use filter_bench_core::ConnectionError;
use filter_bench_core::ConnectionProvider;
use filter_bench_core::EphemeralDatabase;
use filter_bench_core::EquivalenceError;
use filter_bench_core::EventSink;
use filter_bench_core::FactTableOptions;
use filter_bench_core::FileEventSink;
use filter_bench_core::FilterSet;
use filter_bench_core::FilterSetError;
use filter_bench_core::IdSpace;
use filter_bench_core::NoopEventSink;
use filter_bench_core::ProvisioningError;
use filter_bench_core::ReportSink;
use filter_bench_core::SchemaProvisioner;
use filter_bench_core::SeedGenerator;
use filter_bench_core::SeedSpecError;
use filter_bench_core::StderrEventSink;
use filter_bench_core::Strategy;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Fatal benchmark run errors.
#[derive(Debug, Error)]
pub enum BenchError {
    /// Configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Seed parameters are invalid.
    #[error("invalid seed settings: {0}")]
    Seed(#[from] SeedSpecError),
    /// A connection could not be opened.
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    /// Database, schema, or seed provisioning failed.
    #[error(transparent)]
    Provisioning(#[from] ProvisioningError),
    /// The filter set could not be sampled.
    #[error("invalid filter set: {0}")]
    FilterSet(#[from] FilterSetError),
    /// Strategies returned different results.
    #[error("result mismatch: {0}")]
    Equivalence(#[from] EquivalenceError),
    /// The event log could not be opened.
    #[error("event log error: {0}")]
    EventLog(String),
}

// ============================================================================
// SECTION: Event Sink Selection
// ============================================================================

/// Opens the event sink selected by `logging`.
///
/// # Errors
///
/// Returns [`BenchError::EventLog`] when the event file cannot be opened.
pub fn open_event_sink(logging: &LoggingConfig) -> Result<Box<dyn EventSink>, BenchError> {
    match (logging.events, &logging.path) {
        (EventLogMode::Stderr, _) => Ok(Box::new(StderrEventSink)),
        (EventLogMode::Off, _) => Ok(Box::new(NoopEventSink)),
        (EventLogMode::File, Some(path)) => FileEventSink::new(path)
            .map(|sink| Box::new(sink) as Box<dyn EventSink>)
            .map_err(|err| BenchError::EventLog(format!("{}: {err}", path.display()))),
        (EventLogMode::File, None) => {
            Err(BenchError::EventLog("logging.path is required for file events".to_string()))
        }
    }
}

// ============================================================================
// SECTION: Run
// ============================================================================

/// Runs one benchmark against a freshly created database.
///
/// Every entry is forwarded to `sink` as it is recorded. The database is
/// dropped afterwards unless `benchmark.keep_database` is set, including when
/// the run fails.
///
/// # Errors
///
/// Returns [`BenchError`] when configuration, provisioning, or sampling fails,
/// or when `benchmark.verify_equivalence` is set and strategies disagree.
pub fn run_benchmark(
    config: &FilterBenchConfig,
    provider: &dyn ConnectionProvider,
    sink: &mut dyn ReportSink,
    events: &dyn EventSink,
) -> Result<BenchmarkReport, BenchError> {
    config.validate()?;
    let generator = SeedGenerator::new(config.seed.to_spec()?)?;
    let database = EphemeralDatabase::create(provider, events)?;
    let outcome = run_in_database(config, provider, &generator, sink, events);
    let finished = database.finish(config.benchmark.keep_database);
    let report = outcome?;
    finished?;
    if config.benchmark.verify_equivalence {
        report.check_equivalence()?;
    }
    Ok(report)
}

/// Prepares, seeds, samples, and runs the strategies.
fn run_in_database(
    config: &FilterBenchConfig,
    provider: &dyn ConnectionProvider,
    generator: &SeedGenerator,
    sink: &mut dyn ReportSink,
    events: &dyn EventSink,
) -> Result<BenchmarkReport, BenchError> {
    let mut rng = generator.rng();
    {
        let mut seed_conn = provider.connect()?;
        SchemaProvisioner::new(&mut seed_conn, events).prepare(FactTableOptions {
            recreate: true,
            index: config.benchmark.index_account_id,
        })?;
        generator.generate(&mut seed_conn, &mut rng, events)?;
        SchemaProvisioner::new(&mut seed_conn, events).analyze_fact_table()?;
    }

    let space = IdSpace::new(generator.spec().num_accounts)?;
    let filter = FilterSet::sample(space, config.benchmark.sample_percent, &mut rng)?;
    let strategies =
        Strategy::from_kinds(&config.benchmark.strategies, config.benchmark.strategy_options());
    let mut query_conn = provider.connect()?;
    Ok(config.benchmark.runner().run(&mut query_conn, &filter, &strategies, sink, events))
}
