// crates/filter-bench-core/src/strategy/tests.rs
// ============================================================================
// Module: Query Strategy Unit Tests
// Description: Unit tests for strategy labels and construction.
// Purpose: Keep labels stable and the built set aligned with its kinds.
// ============================================================================

#![allow(clippy::expect_used, reason = "Unit tests use expect for setup clarity.")]

use std::num::NonZeroUsize;

use super::QueryStrategy;
use super::Strategy;
use super::StrategyKind;
use super::StrategyOptions;
use crate::bulk_loader::BulkLoader;
use crate::sql::StatementLimit;

#[test]
fn strategy_kind_labels_roundtrip() {
    for kind in StrategyKind::ALL {
        let parsed: StrategyKind = kind.as_str().parse().expect("parse label");
        assert_eq!(parsed, kind);
        assert_eq!(kind.to_string(), kind.as_str());
    }
}

#[test]
fn strategy_kind_rejects_unknown_label() {
    let result = "use_where_in".parse::<StrategyKind>();
    assert!(result.is_err());
}

#[test]
fn strategy_kind_serde_uses_snake_case() {
    let json = serde_json::to_string(&StrategyKind::JoinTempTable).expect("serialize");
    assert_eq!(json, "\"join_temp_table\"");
}

#[test]
fn strategy_from_kinds_preserves_order_and_names() {
    let options = StrategyOptions {
        statement_limit: StatementLimit::new(1_024),
        loader: BulkLoader::new(NonZeroUsize::new(10).expect("nonzero")),
    };
    let kinds = [StrategyKind::JoinTempTable, StrategyKind::InlineList];
    let strategies = Strategy::from_kinds(&kinds, options);
    let names: Vec<_> = strategies.iter().map(|strategy| strategy.name()).collect();
    assert_eq!(names, vec!["join_temp_table", "inline_list"]);
    assert_eq!(strategies[0].kind(), StrategyKind::JoinTempTable);
}

#[test]
fn strategy_default_order_matches_benchmark_order() {
    let labels: Vec<_> = StrategyKind::ALL.iter().map(|kind| kind.as_str()).collect();
    assert_eq!(labels, vec!["array_membership", "inline_list", "join_temp_table"]);
}
