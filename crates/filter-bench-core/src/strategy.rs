// crates/filter-bench-core/src/strategy.rs
// ============================================================================
// Module: Query Strategies
// Description: Three interchangeable ways to send a filter set to the engine.
// Purpose: Run the same aggregate under inline-list, array, and join filters.
// Dependencies: postgres, serde
// ============================================================================

//! ## Overview
//! Every strategy answers the same question (`SUM(total)` per account for the
//! filter set) and must return the same multiset of rows:
//! - [`InlineList`]: `account_id IN (1, 2, ...)`.
//! - [`ArrayMembership`]: `account_id = ANY (VALUES (1), (2), ...)`.
//! - [`JoinTempTable`]: copy the ids into a transaction-scoped relation and
//!   join against it.
//!
//! [`Strategy`] is the closed set the runner iterates; [`QueryStrategy`] is the
//! seam, generic over the connection type so the runner can be exercised with
//! stand-in connections.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use postgres::Client;
use postgres::Row;
use postgres::Transaction;
use serde::Deserialize;
use serde::Serialize;

use crate::bulk_loader::BulkLoader;
use crate::error::StrategyError;
use crate::events::BenchEventKind;
use crate::events::EventSink;
use crate::filter_set::FilterSet;
use crate::model::AggregateRow;
use crate::sql;
use crate::sql::StatementLimit;

// ============================================================================
// SECTION: Trait
// ============================================================================

/// A filter-transmission strategy executed against connection type `C`.
pub trait QueryStrategy<C = Client> {
    /// Stable label used in reports and events.
    fn name(&self) -> &'static str;

    /// Runs the aggregate restricted to `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError`] when the statement is too large, the engine
    /// rejects it, or the bulk transfer fails.
    fn execute(
        &self,
        conn: &mut C,
        filter: &FilterSet,
        events: &dyn EventSink,
    ) -> Result<Vec<AggregateRow>, StrategyError>;
}

impl<C, S: QueryStrategy<C> + ?Sized> QueryStrategy<C> for &S {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn execute(
        &self,
        conn: &mut C,
        filter: &FilterSet,
        events: &dyn EventSink,
    ) -> Result<Vec<AggregateRow>, StrategyError> {
        (**self).execute(conn, filter, events)
    }
}

// ============================================================================
// SECTION: Strategy Kinds
// ============================================================================

/// Labels for the built-in strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// `IN (...)` literal list.
    InlineList,
    /// `= ANY (VALUES ...)` membership.
    ArrayMembership,
    /// Copy-loaded temp relation joined to the fact table.
    JoinTempTable,
}

impl StrategyKind {
    /// All strategies in default execution order.
    pub const ALL: [Self; 3] = [Self::ArrayMembership, Self::InlineList, Self::JoinTempTable];

    /// Returns the stable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InlineList => "inline_list",
            Self::ArrayMembership => "array_membership",
            Self::JoinTempTable => "join_temp_table",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| format!("unknown strategy: {value}"))
    }
}

// ============================================================================
// SECTION: Shared Helpers
// ============================================================================

/// Decodes `(account_id, total_requests)` rows.
fn decode_rows(rows: &[Row]) -> Result<Vec<AggregateRow>, StrategyError> {
    rows.iter()
        .map(|row| {
            let account_id: i64 =
                row.try_get(0).map_err(|err| StrategyError::Decode(err.to_string()))?;
            let total_requests: i64 =
                row.try_get(1).map_err(|err| StrategyError::Decode(err.to_string()))?;
            Ok(AggregateRow::new(account_id, total_requests))
        })
        .collect()
}

/// Checks and runs a literal-filter query.
fn run_literal(
    client: &mut Client,
    strategy: &'static str,
    limit: StatementLimit,
    query: &str,
) -> Result<Vec<AggregateRow>, StrategyError> {
    limit.check(strategy, query)?;
    let rows = client
        .query(query, &[])
        .map_err(|err| StrategyError::from_query(strategy, query.len(), &err))?;
    decode_rows(&rows)
}

/// Runs `body` in a transaction: commit on success, explicit rollback on error.
///
/// Temp objects created with `ON COMMIT DROP` disappear on either path.
///
/// # Errors
///
/// Returns the error from `body`, or [`StrategyError::Transaction`] when the
/// transaction cannot begin or commit.
pub fn with_transaction<T>(
    client: &mut Client,
    body: impl FnOnce(&mut Transaction<'_>) -> Result<T, StrategyError>,
) -> Result<T, StrategyError> {
    let mut tx = client.transaction().map_err(|err| StrategyError::Transaction(err.to_string()))?;
    match body(&mut tx) {
        Ok(value) => {
            tx.commit().map_err(|err| StrategyError::Transaction(err.to_string()))?;
            Ok(value)
        }
        Err(err) => {
            // A failed rollback means the session is gone; the engine drops temp objects then.
            let _ = tx.rollback();
            Err(err)
        }
    }
}

// ============================================================================
// SECTION: Inline List
// ============================================================================

/// `account_id IN (<literal ids>)` strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineList {
    /// Statement-size limit applied before sending.
    limit: StatementLimit,
}

impl InlineList {
    /// Creates the strategy with a statement-size limit.
    #[must_use]
    pub const fn new(limit: StatementLimit) -> Self {
        Self {
            limit,
        }
    }
}

impl QueryStrategy for InlineList {
    fn name(&self) -> &'static str {
        StrategyKind::InlineList.as_str()
    }

    fn execute(
        &self,
        conn: &mut Client,
        filter: &FilterSet,
        _events: &dyn EventSink,
    ) -> Result<Vec<AggregateRow>, StrategyError> {
        run_literal(conn, self.name(), self.limit, &sql::inline_list_query(filter))
    }
}

// ============================================================================
// SECTION: Array Membership
// ============================================================================

/// `account_id = ANY (VALUES ...)` strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArrayMembership {
    /// Statement-size limit applied before sending.
    limit: StatementLimit,
}

impl ArrayMembership {
    /// Creates the strategy with a statement-size limit.
    #[must_use]
    pub const fn new(limit: StatementLimit) -> Self {
        Self {
            limit,
        }
    }
}

impl QueryStrategy for ArrayMembership {
    fn name(&self) -> &'static str {
        StrategyKind::ArrayMembership.as_str()
    }

    fn execute(
        &self,
        conn: &mut Client,
        filter: &FilterSet,
        _events: &dyn EventSink,
    ) -> Result<Vec<AggregateRow>, StrategyError> {
        run_literal(conn, self.name(), self.limit, &sql::array_membership_query(filter))
    }
}

// ============================================================================
// SECTION: Join Temp Table
// ============================================================================

/// Copy-in temp relation joined against the fact table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinTempTable {
    /// Loader used to populate the relation.
    loader: BulkLoader,
}

impl JoinTempTable {
    /// Creates the strategy with a bulk loader.
    #[must_use]
    pub const fn new(loader: BulkLoader) -> Self {
        Self {
            loader,
        }
    }
}

impl QueryStrategy for JoinTempTable {
    fn name(&self) -> &'static str {
        StrategyKind::JoinTempTable.as_str()
    }

    fn execute(
        &self,
        conn: &mut Client,
        filter: &FilterSet,
        events: &dyn EventSink,
    ) -> Result<Vec<AggregateRow>, StrategyError> {
        with_transaction(conn, |tx| {
            tx.batch_execute(&sql::create_ephemeral_relation())
                .map_err(|err| StrategyError::Transaction(err.to_string()))?;
            let batches = self.loader.load(tx, filter)?;
            events.emit(BenchEventKind::BulkLoadCompleted {
                rows: filter.len(),
                batches,
            });
            let rows = tx
                .query(sql::join_query().as_str(), &[])
                .map_err(|err| StrategyError::Query(err.to_string()))?;
            decode_rows(&rows)
        })
    }
}

// ============================================================================
// SECTION: Strategy Set
// ============================================================================

/// Shared settings used to build strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrategyOptions {
    /// Limit for literal-filter statements.
    pub statement_limit: StatementLimit,
    /// Loader for the join strategy.
    pub loader: BulkLoader,
}

/// The closed set of built-in strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Inline literal list.
    InlineList(InlineList),
    /// Value-tuple membership.
    ArrayMembership(ArrayMembership),
    /// Copy-loaded temp relation join.
    JoinTempTable(JoinTempTable),
}

impl Strategy {
    /// Builds the strategy for `kind`.
    #[must_use]
    pub const fn from_kind(kind: StrategyKind, options: StrategyOptions) -> Self {
        match kind {
            StrategyKind::InlineList => Self::InlineList(InlineList::new(options.statement_limit)),
            StrategyKind::ArrayMembership => {
                Self::ArrayMembership(ArrayMembership::new(options.statement_limit))
            }
            StrategyKind::JoinTempTable => Self::JoinTempTable(JoinTempTable::new(options.loader)),
        }
    }

    /// Builds strategies for `kinds`, preserving order.
    #[must_use]
    pub fn from_kinds(kinds: &[StrategyKind], options: StrategyOptions) -> Vec<Self> {
        kinds.iter().map(|kind| Self::from_kind(*kind, options)).collect()
    }

    /// Returns the strategy's kind.
    #[must_use]
    pub const fn kind(&self) -> StrategyKind {
        match self {
            Self::InlineList(_) => StrategyKind::InlineList,
            Self::ArrayMembership(_) => StrategyKind::ArrayMembership,
            Self::JoinTempTable(_) => StrategyKind::JoinTempTable,
        }
    }
}

impl QueryStrategy for Strategy {
    fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    fn execute(
        &self,
        conn: &mut Client,
        filter: &FilterSet,
        events: &dyn EventSink,
    ) -> Result<Vec<AggregateRow>, StrategyError> {
        match self {
            Self::InlineList(strategy) => strategy.execute(conn, filter, events),
            Self::ArrayMembership(strategy) => strategy.execute(conn, filter, events),
            Self::JoinTempTable(strategy) => strategy.execute(conn, filter, events),
        }
    }
}

#[cfg(test)]
mod tests;
