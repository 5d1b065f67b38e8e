// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for Filter Bench system-tests.
// Purpose: Provide the Postgres fixture and benchmark database scaffolding.
// Dependencies: filter-bench-core, postgres, testcontainers
// ============================================================================

//! ## Overview
//! Shared helpers for Filter Bench system-tests.
//! Invariants:
//! - Every test owns a uniquely named benchmark database.
//! - Observation queries use their own connection, never the strategy's.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod fixtures;
pub mod infra;
