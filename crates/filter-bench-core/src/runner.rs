// crates/filter-bench-core/src/runner.rs
// ============================================================================
// Module: Benchmark Runner
// Description: Sequential timing loop over the configured strategies.
// Purpose: Measure each strategy while isolating per-strategy failures.
// Dependencies: crate::strategy, crate::report, crate::events
// ============================================================================

//! ## Overview
//! The runner executes strategies strictly in the given order, each for the
//! configured number of iterations, timing every `execute` call with a
//! monotonic clock. A failing iteration becomes a [`Outcome::Failed`] entry and
//! the loop moves on; nothing is retried and nothing is ranked here.
//! Events a strategy raises while timed are buffered and delivered to the
//! sink after the clock stops, so sink I/O never lands in a measurement.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cell::RefCell;
use std::num::NonZeroU32;
use std::time::Instant;

use crate::events::BenchEvent;
use crate::events::BenchEventKind;
use crate::events::EventSink;
use crate::filter_set::FilterSet;
use crate::report::BenchmarkReport;
use crate::report::Outcome;
use crate::report::ReportEntry;
use crate::report::ReportSink;
use crate::strategy::QueryStrategy;

// ============================================================================
// SECTION: Deferred Events
// ============================================================================

/// Holds events raised inside the timed region.
#[derive(Default)]
struct DeferredEvents {
    /// Events in emission order.
    events: RefCell<Vec<BenchEvent>>,
}

impl DeferredEvents {
    /// Forwards buffered events to `sink`, oldest first.
    fn flush_into(self, sink: &dyn EventSink) {
        for event in self.events.into_inner() {
            sink.record(&event);
        }
    }
}

impl EventSink for DeferredEvents {
    fn record(&self, event: &BenchEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Sequential benchmark runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkRunner {
    /// Iterations per strategy.
    iterations: NonZeroU32,
}

impl Default for BenchmarkRunner {
    fn default() -> Self {
        Self::new(NonZeroU32::MIN)
    }
}

impl BenchmarkRunner {
    /// Creates a runner executing each strategy `iterations` times.
    #[must_use]
    pub const fn new(iterations: NonZeroU32) -> Self {
        Self {
            iterations,
        }
    }

    /// Returns the iteration count.
    #[must_use]
    pub const fn iterations(self) -> NonZeroU32 {
        self.iterations
    }

    /// Runs every strategy against `conn` and returns the full report.
    ///
    /// Each entry is forwarded to `sink` as soon as it is recorded; `sink`
    /// also receives the finished report.
    pub fn run<C, S: QueryStrategy<C>>(
        self,
        conn: &mut C,
        filter: &FilterSet,
        strategies: &[S],
        sink: &mut dyn ReportSink,
        events: &dyn EventSink,
    ) -> BenchmarkReport {
        let mut report = BenchmarkReport::new(filter.len());
        for strategy in strategies {
            let name = strategy.name();
            for iteration in 1 ..= self.iterations.get() {
                events.emit(BenchEventKind::StrategyStarted {
                    strategy: name.to_string(),
                    iteration,
                    filter_size: filter.len(),
                });
                let deferred = DeferredEvents::default();
                let started = Instant::now();
                let result = strategy.execute(conn, filter, &deferred);
                let duration = started.elapsed();
                deferred.flush_into(events);
                let outcome = match result {
                    Ok(rows) => {
                        let row_count = rows.len();
                        events.emit(BenchEventKind::StrategyCompleted {
                            strategy: name.to_string(),
                            iteration,
                            duration_us: duration.as_micros(),
                            rows: row_count,
                        });
                        report.record_result(name, rows);
                        Outcome::Measured {
                            duration,
                            rows: row_count,
                        }
                    }
                    Err(err) => {
                        events.emit(BenchEventKind::StrategyFailed {
                            strategy: name.to_string(),
                            iteration,
                            error_kind: err.kind().to_string(),
                            message: err.to_string(),
                        });
                        Outcome::Failed {
                            kind: err.kind(),
                            message: err.to_string(),
                        }
                    }
                };
                let entry = ReportEntry {
                    strategy: name,
                    iteration,
                    outcome,
                };
                sink.record(&entry);
                report.push(entry);
            }
        }
        sink.finish(&report);
        report
    }
}
