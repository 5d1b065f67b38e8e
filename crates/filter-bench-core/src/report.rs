// crates/filter-bench-core/src/report.rs
// ============================================================================
// Module: Benchmark Report
// Description: Per-strategy timing entries, summaries, and result equivalence.
// Purpose: Record what each strategy measured without formatting it.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! A [`BenchmarkReport`] correlates strategy name, iteration, and outcome. An
//! outcome is either a measured duration or an explicit failure, so a failed
//! strategy is never mistaken for a zero-cost one. Formatting belongs to
//! [`ReportSink`] implementations outside this crate.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use thiserror::Error;

use crate::model::AggregateRow;
use crate::model::sort_rows;

// ============================================================================
// SECTION: Entries
// ============================================================================

/// Result of one strategy iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The strategy completed and was timed.
    Measured {
        /// Wall-clock duration of `execute`.
        duration: Duration,
        /// Result rows returned.
        rows: usize,
    },
    /// The strategy failed; no measurement exists.
    Failed {
        /// Stable error label.
        kind: &'static str,
        /// Error message.
        message: String,
    },
}

/// One report line: strategy, iteration, outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    /// Strategy label.
    pub strategy: &'static str,
    /// One-based iteration number.
    pub iteration: u32,
    /// Measured duration or failure.
    pub outcome: Outcome,
}

impl ReportEntry {
    /// Returns the duration when the iteration was measured.
    #[must_use]
    pub const fn duration(&self) -> Option<Duration> {
        match &self.outcome {
            Outcome::Measured {
                duration,
                ..
            } => Some(*duration),
            Outcome::Failed {
                ..
            } => None,
        }
    }

    /// Returns true when the iteration failed.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self.outcome, Outcome::Failed { .. })
    }
}

// ============================================================================
// SECTION: Sink
// ============================================================================

/// Receives report entries as the runner records them.
pub trait ReportSink {
    /// Records one entry.
    fn record(&mut self, entry: &ReportEntry);

    /// Called once with the complete report.
    fn finish(&mut self, _report: &BenchmarkReport) {}
}

/// Sink that keeps entries in memory.
#[derive(Debug, Default)]
pub struct MemoryReportSink {
    /// Entries in recording order.
    entries: Vec<ReportEntry>,
    /// Whether `finish` was called.
    finished: bool,
}

impl MemoryReportSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded entries.
    #[must_use]
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Returns true once the runner finished.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }
}

impl ReportSink for MemoryReportSink {
    fn record(&mut self, entry: &ReportEntry) {
        self.entries.push(entry.clone());
    }

    fn finish(&mut self, _report: &BenchmarkReport) {
        self.finished = true;
    }
}

// ============================================================================
// SECTION: Summaries
// ============================================================================

/// Aggregated timings for one strategy across iterations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategySummary {
    /// Strategy label.
    pub strategy: &'static str,
    /// Measured iterations.
    pub measured: u32,
    /// Failed iterations.
    pub failed: u32,
    /// Fastest measured iteration.
    pub min: Option<Duration>,
    /// Mean of measured iterations.
    pub mean: Option<Duration>,
    /// Slowest measured iteration.
    pub max: Option<Duration>,
}

/// Strategies disagreed on the result multiset.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{left} returned {left_rows} rows but {right} returned {right_rows} rows ({detail})")]
pub struct EquivalenceError {
    /// Reference strategy.
    pub left: &'static str,
    /// Disagreeing strategy.
    pub right: &'static str,
    /// Reference row count.
    pub left_rows: usize,
    /// Disagreeing row count.
    pub right_rows: usize,
    /// First differing row, if the counts match.
    pub detail: String,
}

// ============================================================================
// SECTION: Report
// ============================================================================

/// Collected entries plus the last successful result of each strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BenchmarkReport {
    /// Size of the filter set the run used.
    filter_size: usize,
    /// Entries in execution order.
    entries: Vec<ReportEntry>,
    /// Sorted rows per strategy, in first-success order.
    results: Vec<(&'static str, Vec<AggregateRow>)>,
}

impl BenchmarkReport {
    /// Creates an empty report for a filter set of `filter_size` ids.
    #[must_use]
    pub const fn new(filter_size: usize) -> Self {
        Self {
            filter_size,
            entries: Vec::new(),
            results: Vec::new(),
        }
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: ReportEntry) {
        self.entries.push(entry);
    }

    /// Stores the rows a strategy returned, replacing any earlier result.
    pub fn record_result(&mut self, strategy: &'static str, rows: Vec<AggregateRow>) {
        let rows = sort_rows(rows);
        if let Some(slot) = self.results.iter_mut().find(|(name, _)| *name == strategy) {
            slot.1 = rows;
        } else {
            self.results.push((strategy, rows));
        }
    }

    /// Returns the filter set size.
    #[must_use]
    pub const fn filter_size(&self) -> usize {
        self.filter_size
    }

    /// Returns the entries in execution order.
    #[must_use]
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Returns the sorted rows a strategy last returned.
    #[must_use]
    pub fn result_for(&self, strategy: &str) -> Option<&[AggregateRow]> {
        self.results.iter().find(|(name, _)| *name == strategy).map(|(_, rows)| rows.as_slice())
    }

    /// Returns true when any iteration failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.entries.iter().any(ReportEntry::is_failure)
    }

    /// Summarizes entries per strategy, in first-appearance order.
    #[must_use]
    pub fn summaries(&self) -> Vec<StrategySummary> {
        let mut order: Vec<&'static str> = Vec::new();
        for entry in &self.entries {
            if !order.contains(&entry.strategy) {
                order.push(entry.strategy);
            }
        }
        order.into_iter().map(|strategy| self.summarize(strategy)).collect()
    }

    /// Summarizes one strategy.
    fn summarize(&self, strategy: &'static str) -> StrategySummary {
        let entries = self.entries.iter().filter(|entry| entry.strategy == strategy);
        let mut measured = 0u32;
        let mut failed = 0u32;
        let mut total = Duration::ZERO;
        let mut min: Option<Duration> = None;
        let mut max: Option<Duration> = None;
        for entry in entries {
            match entry.duration() {
                Some(duration) => {
                    measured = measured.saturating_add(1);
                    total = total.saturating_add(duration);
                    min = Some(min.map_or(duration, |current| current.min(duration)));
                    max = Some(max.map_or(duration, |current| current.max(duration)));
                }
                None => failed = failed.saturating_add(1),
            }
        }
        let mean = if measured == 0 { None } else { Some(total / measured) };
        StrategySummary {
            strategy,
            measured,
            failed,
            min,
            mean,
            max,
        }
    }

    /// Verifies every successful strategy returned the same row multiset.
    ///
    /// Strategies without a successful result are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`EquivalenceError`] for the first strategy that disagrees with
    /// the first successful one.
    pub fn check_equivalence(&self) -> Result<(), EquivalenceError> {
        let Some((left, reference)) = self.results.first() else {
            return Ok(());
        };
        for (right, rows) in self.results.iter().skip(1) {
            if rows == reference {
                continue;
            }
            let detail = reference
                .iter()
                .zip(rows.iter())
                .find(|(a, b)| a != b)
                .map_or_else(
                    || "row counts differ".to_string(),
                    |(a, b)| {
                        format!(
                            "account {} total {} vs account {} total {}",
                            a.account_id, a.total_requests, b.account_id, b.total_requests
                        )
                    },
                );
            return Err(EquivalenceError {
                left,
                right,
                left_rows: reference.len(),
                right_rows: rows.len(),
                detail,
            });
        }
        Ok(())
    }
}
