// crates/filter-bench-core/src/model.rs
// ============================================================================
// Module: Data Model
// Description: Fact records and aggregate rows shared by every strategy.
// Purpose: Give all strategies one comparable result shape.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! The fact table holds synthetic [`RequestRecord`] rows. Every query strategy
//! reduces it to [`AggregateRow`] values (`SUM(total)` grouped by account id);
//! rows are unordered, so comparisons go through [`sort_rows`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use time::Date;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Name of the fact table every strategy filters.
pub const FACT_TABLE: &str = "requests";
/// Name of the transaction-scoped relation used by the join strategy.
pub const EPHEMERAL_RELATION: &str = "tmp_accounts";
/// Name of the optional secondary index on `requests.account_id`.
pub const ACCOUNT_INDEX: &str = "ix_requests_account_id";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Account identifier used as the filtered foreign key.
pub type AccountId = i64;

/// A single synthetic fact record.
///
/// # Invariants
/// - `total` is non-negative (also enforced by a table `CHECK`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestRecord {
    /// Account the request belongs to.
    pub account_id: AccountId,
    /// Calendar day of the request.
    pub request_date: Date,
    /// Request count recorded for the day.
    pub total: i32,
}

/// Aggregated result row: `SUM(total)` for one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AggregateRow {
    /// Account identifier.
    pub account_id: AccountId,
    /// Sum of `total` over the account's requests.
    pub total_requests: i64,
}

impl AggregateRow {
    /// Creates a new aggregate row.
    #[must_use]
    pub const fn new(account_id: AccountId, total_requests: i64) -> Self {
        Self {
            account_id,
            total_requests,
        }
    }
}

/// Sorts rows by account id (then total) so multisets compare with `==`.
#[must_use]
pub fn sort_rows(mut rows: Vec<AggregateRow>) -> Vec<AggregateRow> {
    rows.sort_unstable();
    rows
}
