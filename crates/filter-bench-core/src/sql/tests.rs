// crates/filter-bench-core/src/sql/tests.rs
// ============================================================================
// Module: SQL Text Unit Tests
// Description: Unit tests for filter query construction and size limits.
// Purpose: Validate statement shapes without a live database.
// ============================================================================

#![allow(
    clippy::panic,
    clippy::use_debug,
    reason = "Unit tests panic with debug output on unexpected variants."
)]

use time::macros::date;

use super::StatementLimit;
use super::array_membership_query;
use super::create_database;
use super::create_ephemeral_relation;
use super::drop_database;
use super::inline_list_query;
use super::insert_requests;
use super::join_query;
use crate::error::StrategyError;
use crate::filter_set::FilterSet;
use crate::model::RequestRecord;

#[test]
fn inline_list_query_joins_literal_ids() {
    let sql = inline_list_query(&FilterSet::new([4, 9, 2]));
    assert!(sql.contains("WHERE account_id IN (4, 9, 2) GROUP BY account_id"));
    assert!(sql.starts_with("SELECT account_id, SUM(total) AS total_requests FROM requests"));
}

#[test]
fn array_membership_query_uses_value_tuples() {
    let sql = array_membership_query(&FilterSet::new([1, 2]));
    assert!(sql.contains("WHERE account_id = ANY (VALUES (1), (2)) GROUP BY account_id"));
}

#[test]
fn empty_filter_set_uses_false_predicate() {
    let empty = FilterSet::empty();
    assert!(inline_list_query(&empty).contains("WHERE FALSE"));
    assert!(array_membership_query(&empty).contains("WHERE FALSE"));
}

#[test]
fn ephemeral_relation_drops_on_commit() {
    let ddl = create_ephemeral_relation();
    assert!(ddl.starts_with("CREATE TEMP TABLE tmp_accounts"));
    assert!(ddl.contains("PRIMARY KEY (account_id)"));
    assert!(ddl.ends_with("ON COMMIT DROP"));
}

#[test]
fn join_query_groups_by_fact_account() {
    let sql = join_query();
    assert!(sql.contains("INNER JOIN tmp_accounts t ON t.account_id = r.account_id"));
    assert!(sql.ends_with("GROUP BY r.account_id"));
}

#[test]
fn statement_limit_accepts_exact_size() {
    let sql = "SELECT 1";
    assert!(StatementLimit::new(sql.len()).check("inline_list", sql).is_ok());
}

#[test]
fn statement_limit_rejects_oversized_text() {
    let sql = inline_list_query(&FilterSet::new(1 ..= 1_000));
    let result = StatementLimit::new(64).check("inline_list", &sql);
    match result {
        Err(StrategyError::StatementTooLarge {
            strategy,
            limit,
            actual,
        }) => {
            assert_eq!(strategy, "inline_list");
            assert_eq!(limit, 64);
            assert_eq!(actual, sql.len());
        }
        other => panic!("expected statement too large, got {other:?}"),
    }
}

#[test]
fn statement_limit_default_leaves_room_for_message_framing() {
    let limit = StatementLimit::default().max_bytes();
    assert_eq!(limit, super::DEFAULT_MAX_STATEMENT_BYTES);
    // Parse message: 4-byte length, type byte, empty name, text, NUL, parameter count.
    assert!(limit + 1 + 4 + 1 + 1 + 2 < super::ENGINE_MAX_ALLOC_BYTES - 1);
}

#[test]
fn insert_requests_renders_date_literals() {
    let records = [
        RequestRecord {
            account_id: 1,
            request_date: date!(2015 - 11 - 01),
            total: 5,
        },
        RequestRecord {
            account_id: 2,
            request_date: date!(2015 - 11 - 30),
            total: 7,
        },
    ];
    assert_eq!(
        insert_requests(&records),
        "INSERT INTO requests (account_id, request_date, total) VALUES (1, DATE '2015-11-01', 5), \
         (2, DATE '2015-11-30', 7)"
    );
}

#[test]
fn database_ddl_targets_named_database() {
    assert_eq!(create_database("bench_db"), "CREATE DATABASE bench_db");
    assert_eq!(drop_database("bench_db"), "DROP DATABASE IF EXISTS bench_db WITH (FORCE)");
}
