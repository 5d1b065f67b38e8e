// crates/filter-bench-config/src/config/tests.rs
// ============================================================================
// Module: Configuration Unit Tests
// Description: Unit tests for path resolution and section conversion helpers.
// Purpose: Validate private helpers that integration tests cannot reach.
// ============================================================================

#![allow(clippy::expect_used, reason = "Unit tests use expect for setup clarity.")]

use std::path::Path;
use std::path::PathBuf;

use super::BenchmarkConfig;
use super::MAX_ITERATIONS;
use super::SeedConfig;
use super::resolve_path;
use super::validate_path;
use super::validate_path_string;

#[test]
fn resolve_path_prefers_explicit_argument() {
    let resolved = resolve_path(Some(Path::new("custom.toml"))).expect("resolve");
    assert_eq!(resolved, PathBuf::from("custom.toml"));
}

#[test]
fn validate_path_rejects_overlong_component() {
    let component = "a".repeat(300);
    assert!(validate_path(Path::new(&component)).is_err());
    assert!(validate_path(Path::new("filter-bench.toml")).is_ok());
}

#[test]
fn validate_path_string_rejects_whitespace_only() {
    let result = validate_path_string("logging.path", "   ");
    assert!(result.is_err());
}

#[test]
fn seed_config_default_converts_to_default_spec() {
    let spec = SeedConfig::default().to_spec().expect("spec");
    assert_eq!(spec, filter_bench_core::SeedSpec::default());
}

#[test]
fn benchmark_config_builds_runner_and_options() {
    let config = BenchmarkConfig {
        iterations: 4,
        copy_batch_size: 250,
        max_statement_bytes: 4096,
        ..BenchmarkConfig::default()
    };
    assert_eq!(config.runner().iterations().get(), 4);
    let options = config.strategy_options();
    assert_eq!(options.loader.batch_size().get(), 250);
    assert_eq!(options.statement_limit.max_bytes(), 4096);
}

#[test]
fn benchmark_config_caps_iterations() {
    let config = BenchmarkConfig {
        iterations: MAX_ITERATIONS + 1,
        ..BenchmarkConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn benchmark_config_caps_statement_bytes_below_engine_ceiling() {
    let at_default = BenchmarkConfig {
        max_statement_bytes: filter_bench_core::sql::DEFAULT_MAX_STATEMENT_BYTES,
        ..BenchmarkConfig::default()
    };
    assert!(at_default.validate().is_ok());
    let engine_max = BenchmarkConfig {
        max_statement_bytes: filter_bench_core::sql::ENGINE_MAX_ALLOC_BYTES,
        ..BenchmarkConfig::default()
    };
    assert!(engine_max.validate().is_err());
}
