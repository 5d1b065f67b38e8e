// crates/filter-bench-cli/src/lib.rs
// ============================================================================
// Module: Filter Bench CLI Library
// Description: Benchmark session wiring and report rendering for the CLI.
// Purpose: Keep the binary thin and the run pipeline testable.
// Dependencies: filter-bench-config, filter-bench-core, serde_json
// ============================================================================

//! ## Overview
//! Library half of the `filter-bench` binary. [`bench::run_benchmark`] drives
//! a full run; [`report`] renders it as text or JSON.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod bench;
pub mod report;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use bench::BenchError;
pub use bench::open_event_sink;
pub use bench::run_benchmark;
pub use report::JsonReportSink;
pub use report::TextReportSink;
