// crates/filter-bench-core/src/lib.rs
// ============================================================================
// Module: Filter Bench Core Library
// Description: Query-strategy benchmark engine for large filter sets.
// Purpose: Compare inline-list, array-membership, and temp-table join filters.
// Dependencies: postgres, rand, serde, thiserror, time
// ============================================================================

//! ## Overview
//! `filter-bench-core` measures three ways of restricting an aggregate query
//! on a large fact table to a large set of foreign-key ids:
//!
//! - **Inline list**: ids spliced into `account_id IN (...)`.
//! - **Array membership**: ids spliced into `account_id = ANY (VALUES ...)`.
//! - **Join temp table**: ids copied in bulk into a transaction-scoped
//!   temporary relation that is joined against the fact table.
//!
//! All three return the same multiset of `(account_id, SUM(total))` rows for a
//! given filter set. The crate provisions an ephemeral database, seeds it,
//! runs each strategy with timing, and reports results through sinks. It
//! performs no output formatting of its own.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod bulk_loader;
pub mod connection;
pub mod error;
pub mod events;
pub mod filter_set;
pub mod model;
pub mod provisioner;
pub mod report;
pub mod runner;
pub mod seed;
pub mod sql;
pub mod strategy;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use bulk_loader::BulkLoader;
pub use bulk_loader::DEFAULT_COPY_BATCH_SIZE;
pub use connection::ConnectionProvider;
pub use connection::DatabaseConfig;
pub use connection::PostgresConnectionProvider;
pub use error::ConnectionError;
pub use error::ProvisioningError;
pub use error::StrategyError;
pub use error::TransferError;
pub use events::BenchEvent;
pub use events::BenchEventKind;
pub use events::EventSink;
pub use events::FileEventSink;
pub use events::NoopEventSink;
pub use events::StderrEventSink;
pub use filter_set::FilterSet;
pub use filter_set::FilterSetError;
pub use filter_set::IdSpace;
pub use model::AccountId;
pub use model::AggregateRow;
pub use model::RequestRecord;
pub use provisioner::EphemeralDatabase;
pub use provisioner::FactTableOptions;
pub use provisioner::SchemaProvisioner;
pub use report::BenchmarkReport;
pub use report::EquivalenceError;
pub use report::MemoryReportSink;
pub use report::Outcome;
pub use report::ReportEntry;
pub use report::ReportSink;
pub use report::StrategySummary;
pub use runner::BenchmarkRunner;
pub use seed::SeedGenerator;
pub use seed::SeedSpec;
pub use seed::SeedSpecError;
pub use sql::StatementLimit;
pub use strategy::QueryStrategy;
pub use strategy::Strategy;
pub use strategy::StrategyKind;
pub use strategy::StrategyOptions;
