//! Config load validation tests for filter-bench-config.
// crates/filter-bench-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

use std::io::Write;
use std::path::Path;

use filter_bench_config::ConfigError;
use filter_bench_config::FilterBenchConfig;
use filter_bench_config::config_toml_example;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<FilterBenchConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

fn write_config(content: &[u8]) -> Result<NamedTempFile, String> {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(content).map_err(|err| err.to_string())?;
    Ok(file)
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    assert_invalid(
        FilterBenchConfig::load(Some(Path::new(&long_path))),
        "config path exceeds max length",
    )
}

#[test]
fn load_rejects_missing_file() -> TestResult {
    assert_invalid(
        FilterBenchConfig::load(Some(Path::new("does-not-exist/filter-bench.toml"))),
        "config io error",
    )
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let file = write_config(&vec![b'#'; 1_048_577])?;
    assert_invalid(FilterBenchConfig::load(Some(file.path())), "config file exceeds size limit")
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let file = write_config(&[0xFF, 0xFE, 0xFF])?;
    assert_invalid(FilterBenchConfig::load(Some(file.path())), "config file must be utf-8")
}

#[test]
fn load_rejects_malformed_toml() -> TestResult {
    let file = write_config(b"[benchmark\niterations = 1")?;
    assert_invalid(FilterBenchConfig::load(Some(file.path())), "config parse error")
}

#[test]
fn load_rejects_unknown_fields() -> TestResult {
    let file = write_config(b"[benchmark]\nunknown = true\n")?;
    assert_invalid(FilterBenchConfig::load(Some(file.path())), "config parse error")
}

#[test]
fn load_empty_file_uses_defaults() -> TestResult {
    let file = write_config(b"")?;
    let config = FilterBenchConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config != FilterBenchConfig::default() {
        return Err("empty config should equal defaults".to_string());
    }
    Ok(())
}

#[test]
fn example_config_loads_as_defaults() -> TestResult {
    let file = write_config(config_toml_example().as_bytes())?;
    let config = FilterBenchConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config != FilterBenchConfig::default() {
        return Err("example config diverged from defaults".to_string());
    }
    Ok(())
}
