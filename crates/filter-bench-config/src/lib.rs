// crates/filter-bench-config/src/lib.rs
// ============================================================================
// Module: Filter Bench Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for filter-bench.toml semantics.
// Dependencies: filter-bench-core, serde, time, toml
// ============================================================================

//! ## Overview
//! `filter-bench-config` defines the configuration model for benchmark runs.
//! It provides strict, fail-closed validation and a deterministic example
//! file. Conversions into core types (`SeedSpec`, `StrategyOptions`,
//! `BenchmarkRunner`) happen only after validation succeeds.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
