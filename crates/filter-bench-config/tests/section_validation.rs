//! Section validation tests for filter-bench-config.
// crates/filter-bench-config/tests/section_validation.rs
// =============================================================================
// Module: Config Section Validation Tests
// Description: Validate per-section constraints and cross-field rules.
// Purpose: Ensure invalid benchmark settings fail before any database work.
// =============================================================================

use filter_bench_config::EventLogMode;
use filter_bench_config::FilterBenchConfig;
use filter_bench_core::StrategyKind;

type TestResult = Result<(), String>;

fn assert_invalid(toml: &str, needle: &str) -> TestResult {
    match FilterBenchConfig::from_toml(toml) {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err(format!("expected invalid config for {toml}")),
    }
}

#[test]
fn database_rejects_unsafe_dbname() -> TestResult {
    assert_invalid("[database]\ndbname = \"bench; drop\"\n", "database.dbname must match")
}

#[test]
fn database_rejects_maintenance_as_target() -> TestResult {
    assert_invalid(
        "[database]\ndbname = \"postgres\"\n",
        "database.dbname must differ from database.maintenance_dbname",
    )
}

#[test]
fn seed_rejects_bad_date() -> TestResult {
    assert_invalid("[seed]\nstart_date = \"11/01/2015\"\n", "seed.start_date must be YYYY-MM-DD")
}

#[test]
fn seed_rejects_zero_accounts() -> TestResult {
    assert_invalid("[seed]\nnum_accounts = 0\n", "num_accounts must be greater than zero")
}

#[test]
fn seed_rejects_inverted_totals() -> TestResult {
    assert_invalid("[seed]\nmin_total = 10\nmax_total = 5\n", "exceeds max_total")
}

#[test]
fn benchmark_rejects_percent_over_hundred() -> TestResult {
    assert_invalid("[benchmark]\nsample_percent = 101\n", "benchmark.sample_percent")
}

#[test]
fn benchmark_rejects_zero_iterations() -> TestResult {
    assert_invalid("[benchmark]\niterations = 0\n", "benchmark.iterations")
}

#[test]
fn benchmark_rejects_zero_copy_batch() -> TestResult {
    assert_invalid("[benchmark]\ncopy_batch_size = 0\n", "benchmark.copy_batch_size")
}

#[test]
fn benchmark_rejects_duplicate_strategies() -> TestResult {
    assert_invalid(
        "[benchmark]\nstrategies = [\"inline_list\", \"inline_list\"]\n",
        "lists inline_list more than once",
    )
}

#[test]
fn benchmark_rejects_empty_strategies() -> TestResult {
    assert_invalid("[benchmark]\nstrategies = []\n", "at least one strategy")
}

#[test]
fn benchmark_rejects_unknown_strategy() -> TestResult {
    assert_invalid("[benchmark]\nstrategies = [\"hash_join\"]\n", "config parse error")
}

#[test]
fn logging_file_mode_requires_path() -> TestResult {
    assert_invalid("[logging]\nevents = \"file\"\n", "logging.path is required")
}

#[test]
fn custom_sections_round_trip_into_core_types() -> TestResult {
    let config = FilterBenchConfig::from_toml(
        "[seed]\nnum_accounts = 10\nnum_requests = 100\nrng_seed = 7\n\n[benchmark]\n\
         strategies = [\"join_temp_table\"]\ncopy_batch_size = 3\n\n[logging]\nevents = \"off\"\n",
    )
    .map_err(|err| err.to_string())?;
    let spec = config.seed.to_spec().map_err(|err| err.to_string())?;
    if spec.num_accounts != 10 || spec.num_requests != 100 || spec.rng_seed != Some(7) {
        return Err("seed spec fields not applied".to_string());
    }
    if config.benchmark.strategies != vec![StrategyKind::JoinTempTable] {
        return Err("strategy list not preserved".to_string());
    }
    if config.benchmark.strategy_options().loader.batch_size().get() != 3 {
        return Err("copy batch size not applied".to_string());
    }
    if config.logging.events != EventLogMode::Off {
        return Err("logging mode not applied".to_string());
    }
    Ok(())
}
