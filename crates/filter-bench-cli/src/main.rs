// crates/filter-bench-cli/src/main.rs
// ============================================================================
// Module: Filter Bench CLI Entry Point
// Description: Command dispatcher for benchmark runs and config utilities.
// Purpose: Run filter-strategy benchmarks from a validated configuration.
// Dependencies: clap, filter-bench-cli, filter-bench-config, filter-bench-core.
// ============================================================================

//! ## Overview
//! `filter-bench run` provisions an ephemeral database, seeds it, runs the
//! configured strategies and prints the report. `filter-bench config`
//! validates a config file or prints the documented example. Output goes
//! through explicit writers; errors go to stderr and map to a failure exit.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use filter_bench_cli::JsonReportSink;
use filter_bench_cli::TextReportSink;
use filter_bench_cli::open_event_sink;
use filter_bench_cli::run_benchmark;
use filter_bench_config::FilterBenchConfig;
use filter_bench_config::config_toml_example;
use filter_bench_core::PostgresConnectionProvider;
use filter_bench_core::StrategyKind;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "filter-bench", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the benchmark against an ephemeral database.
    Run(RunCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Report output formats.
#[derive(ValueEnum, Copy, Clone, Debug, Default)]
enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON document output.
    Json,
}

/// Arguments for `run`.
#[derive(Args, Debug)]
struct RunCommand {
    /// Config file path (defaults to `FILTER_BENCH_CONFIG` or `filter-bench.toml`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Timed iterations per strategy.
    #[arg(long, value_name = "N")]
    iterations: Option<u32>,
    /// Share of accounts placed in the filter set (0-100).
    #[arg(long, value_name = "P")]
    sample_percent: Option<u8>,
    /// Benchmark without the `account_id` index.
    #[arg(long, action = ArgAction::SetTrue)]
    no_index: bool,
    /// Keep the benchmark database after the run.
    #[arg(long, action = ArgAction::SetTrue)]
    keep_database: bool,
    /// Strategy to run; repeat to choose several, in order.
    #[arg(long = "strategy", value_name = "NAME")]
    strategies: Vec<StrategyKind>,
    /// Report output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a config file.
    Validate {
        /// Config file path (defaults to `FILTER_BENCH_CONFIG` or `filter-bench.toml`).
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
    /// Print the documented example config.
    Example,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(command) => command_run(command),
        Commands::Config {
            command,
        } => command_config(command),
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Applies command-line overrides on top of the loaded config.
fn apply_overrides(config: &mut FilterBenchConfig, command: &RunCommand) {
    if let Some(iterations) = command.iterations {
        config.benchmark.iterations = iterations;
    }
    if let Some(percent) = command.sample_percent {
        config.benchmark.sample_percent = percent;
    }
    if command.no_index {
        config.benchmark.index_account_id = false;
    }
    if command.keep_database {
        config.benchmark.keep_database = true;
    }
    if !command.strategies.is_empty() {
        config.benchmark.strategies.clone_from(&command.strategies);
    }
}

/// Executes `run`.
fn command_run(command: RunCommand) -> CliResult<ExitCode> {
    let mut config = FilterBenchConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(err.to_string()))?;
    apply_overrides(&mut config, &command);
    config.validate().map_err(|err| CliError::new(err.to_string()))?;

    let events = open_event_sink(&config.logging).map_err(|err| CliError::new(err.to_string()))?;
    let provider = PostgresConnectionProvider::new(config.database.clone())
        .map_err(|err| CliError::new(err.to_string()))?;

    match command.format {
        OutputFormat::Text => {
            let mut sink = TextReportSink::new(std::io::stdout());
            let result = run_benchmark(&config, &provider, &mut sink, events.as_ref());
            sink.into_inner().map_err(|err| CliError::new(output_error("stdout", &err)))?;
            result.map_err(|err| CliError::new(err.to_string()))?;
        }
        OutputFormat::Json => {
            let mut sink = JsonReportSink::new(std::io::stdout());
            let result = run_benchmark(&config, &provider, &mut sink, events.as_ref());
            sink.into_inner().map_err(|err| CliError::new(output_error("stdout", &err)))?;
            result.map_err(|err| CliError::new(err.to_string()))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes `config` subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate {
            config,
        } => {
            FilterBenchConfig::load(config.as_deref())
                .map_err(|err| CliError::new(err.to_string()))?;
            write_stdout_line("config ok")
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
        ConfigCommand::Example => {
            let mut stdout = std::io::stdout();
            stdout
                .write_all(config_toml_example().as_bytes())
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
