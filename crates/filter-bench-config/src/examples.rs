// crates/filter-bench-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for `filter-bench config example`.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for Filter Bench configuration. The output parses and
//! validates with the defaults it documents.

/// Returns a canonical example `filter-bench.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[database]
host = "localhost"
port = 5432
user = "postgres"
password = ""
# Created at the start of each run and dropped at the end.
dbname = "filter_bench"
maintenance_dbname = "postgres"
connect_timeout_ms = 5000
# 0 keeps the server default.
statement_timeout_ms = 0

[seed]
num_accounts = 5000
num_requests = 500000
start_date = "2015-11-01"
date_span_days = 30
min_total = 100
max_total = 10001
batch_size = 100
# rng_seed = 42

[benchmark]
sample_percent = 50
iterations = 1
index_account_id = true
copy_batch_size = 100
max_statement_bytes = 1073740799
strategies = ["array_membership", "inline_list", "join_temp_table"]
keep_database = false
verify_equivalence = true

[logging]
# "stderr", "file", or "off"
events = "stderr"
# path = "filter-bench-events.jsonl"
"#,
    )
}
