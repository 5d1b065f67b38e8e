// crates/filter-bench-core/src/sql.rs
// ============================================================================
// Module: SQL Text
// Description: Statement text for the fact table, filters, and temp relation.
// Purpose: Keep every strategy's SQL in one place so the shapes stay aligned.
// Dependencies: crate::model
// ============================================================================

//! ## Overview
//! All three strategies share the same `SELECT account_id, SUM(total)` shape
//! and differ only in how the filter set reaches the engine. Literal filters
//! are checked against a [`StatementLimit`] before they are sent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write;

use crate::error::StrategyError;
use crate::filter_set::FilterSet;
use crate::model::ACCOUNT_INDEX;
use crate::model::EPHEMERAL_RELATION;
use crate::model::FACT_TABLE;
use crate::model::RequestRecord;

// ============================================================================
// SECTION: Statement Limit
// ============================================================================

/// Engine maximum allocation size (`MaxAllocSize`).
pub const ENGINE_MAX_ALLOC_BYTES: usize = 1024 * 1024 * 1024 - 1;

/// Bytes reserved for the Parse message framing around the statement text.
pub const PROTOCOL_HEADROOM_BYTES: usize = 1024;

/// Largest statement text the engine accepts in one Parse message.
pub const DEFAULT_MAX_STATEMENT_BYTES: usize = ENGINE_MAX_ALLOC_BYTES - PROTOCOL_HEADROOM_BYTES;

/// Maximum accepted statement text size in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementLimit {
    /// Limit in bytes.
    max_bytes: usize,
}

impl StatementLimit {
    /// Creates a limit of `max_bytes`.
    #[must_use]
    pub const fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
        }
    }

    /// Returns the limit in bytes.
    #[must_use]
    pub const fn max_bytes(self) -> usize {
        self.max_bytes
    }

    /// Rejects statements longer than the limit.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::StatementTooLarge`] when `sql` is too long.
    pub const fn check(self, strategy: &'static str, sql: &str) -> Result<(), StrategyError> {
        if sql.len() > self.max_bytes {
            return Err(StrategyError::StatementTooLarge {
                strategy,
                limit: self.max_bytes,
                actual: sql.len(),
            });
        }
        Ok(())
    }
}

impl Default for StatementLimit {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STATEMENT_BYTES)
    }
}

// ============================================================================
// SECTION: Database DDL
// ============================================================================

/// Drops the benchmark database, terminating leftover sessions.
///
/// `name` must already be a validated identifier.
#[must_use]
pub fn drop_database(name: &str) -> String {
    format!("DROP DATABASE IF EXISTS {name} WITH (FORCE)")
}

/// Creates the benchmark database.
///
/// `name` must already be a validated identifier.
#[must_use]
pub fn create_database(name: &str) -> String {
    format!("CREATE DATABASE {name}")
}

// ============================================================================
// SECTION: Fact Table DDL
// ============================================================================

/// Creates the fact table when missing.
#[must_use]
pub fn create_fact_table() -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {FACT_TABLE} (id SERIAL PRIMARY KEY, account_id BIGINT NOT \
         NULL, request_date DATE NOT NULL, total INTEGER NOT NULL DEFAULT 0 CHECK (total >= 0))"
    )
}

/// Drops the fact table and dependent objects.
#[must_use]
pub fn drop_fact_table() -> String {
    format!("DROP TABLE IF EXISTS {FACT_TABLE} CASCADE")
}

/// Creates the btree index on the filtered column.
#[must_use]
pub fn create_account_index() -> String {
    format!("CREATE INDEX IF NOT EXISTS {ACCOUNT_INDEX} ON {FACT_TABLE} USING btree (account_id)")
}

/// Drops the filtered-column index.
#[must_use]
pub fn drop_account_index() -> String {
    format!("DROP INDEX IF EXISTS {ACCOUNT_INDEX}")
}

/// Refreshes planner statistics for the fact table.
#[must_use]
pub fn analyze_fact_table() -> String {
    format!("ANALYZE {FACT_TABLE}")
}

/// Multi-row insert of `records` as literal values.
#[must_use]
pub fn insert_requests(records: &[RequestRecord]) -> String {
    let mut sql = format!("INSERT INTO {FACT_TABLE} (account_id, request_date, total) VALUES ");
    for (idx, record) in records.iter().enumerate() {
        if idx > 0 {
            sql.push_str(", ");
        }
        let _ = write!(
            sql,
            "({}, DATE '{}', {})",
            record.account_id, record.request_date, record.total
        );
    }
    sql
}

// ============================================================================
// SECTION: Filter Queries
// ============================================================================

/// Writes `ids` comma-joined, each wrapped in `open`/`close`.
fn join_ids(out: &mut String, filter: &FilterSet, open: &str, close: &str) {
    for (idx, id) in filter.iter().enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{open}{id}{close}");
    }
}

/// Wraps a `WHERE` predicate in the shared aggregate query.
fn aggregate_where(predicate: &str) -> String {
    format!(
        "SELECT account_id, SUM(total) AS total_requests FROM {FACT_TABLE} WHERE {predicate} \
         GROUP BY account_id"
    )
}

/// Aggregate query filtered by `account_id IN (1, 2, ...)`.
#[must_use]
pub fn inline_list_query(filter: &FilterSet) -> String {
    if filter.is_empty() {
        return aggregate_where("FALSE");
    }
    let mut predicate = String::from("account_id IN (");
    join_ids(&mut predicate, filter, "", "");
    predicate.push(')');
    aggregate_where(&predicate)
}

/// Aggregate query filtered by `account_id = ANY (VALUES (1), (2), ...)`.
#[must_use]
pub fn array_membership_query(filter: &FilterSet) -> String {
    if filter.is_empty() {
        return aggregate_where("FALSE");
    }
    let mut predicate = String::from("account_id = ANY (VALUES ");
    join_ids(&mut predicate, filter, "(", ")");
    predicate.push(')');
    aggregate_where(&predicate)
}

// ============================================================================
// SECTION: Ephemeral Relation
// ============================================================================

/// Creates the transaction-scoped filter relation.
#[must_use]
pub fn create_ephemeral_relation() -> String {
    format!(
        "CREATE TEMP TABLE {EPHEMERAL_RELATION} (account_id BIGINT, CONSTRAINT \
         {EPHEMERAL_RELATION}_pkey PRIMARY KEY (account_id)) ON COMMIT DROP"
    )
}

/// Copy-in handshake for the filter relation.
#[must_use]
pub fn copy_ephemeral_relation() -> String {
    format!("COPY {EPHEMERAL_RELATION} (account_id) FROM STDIN")
}

/// Aggregate query joined against the filter relation.
#[must_use]
pub fn join_query() -> String {
    format!(
        "SELECT r.account_id, SUM(r.total) AS total_requests FROM {FACT_TABLE} r INNER JOIN \
         {EPHEMERAL_RELATION} t ON t.account_id = r.account_id GROUP BY r.account_id"
    )
}

/// Counts temporary relations named like the filter relation in any session.
#[must_use]
pub fn count_ephemeral_relations() -> &'static str {
    "SELECT COUNT(*) FROM pg_catalog.pg_class WHERE relname = $1 AND relpersistence = 't'"
}

/// Checks for a permanent table or index named `$1`.
#[must_use]
pub fn permanent_relation_exists() -> &'static str {
    "SELECT EXISTS (SELECT 1 FROM pg_catalog.pg_class WHERE relname = $1 AND relpersistence = 'p')"
}

#[cfg(test)]
mod tests;
