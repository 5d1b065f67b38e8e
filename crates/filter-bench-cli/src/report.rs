// crates/filter-bench-cli/src/report.rs
// ============================================================================
// Module: Report Rendering
// Description: Text and JSON report sinks for benchmark output.
// Purpose: Render measured and failed iterations without conflating them.
// Dependencies: filter-bench-core, serde_json
// ============================================================================

//! ## Overview
//! [`TextReportSink`] prints one line per iteration as the runner records it
//! and a per-strategy summary at the end. [`JsonReportSink`] writes a single
//! JSON document once the report is complete. Failed iterations are always
//! rendered as failures with no duration. Write errors are kept and surfaced
//! by `into_inner`, since [`ReportSink`] methods cannot fail.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::io::Write;
use std::time::Duration;

use filter_bench_core::BenchmarkReport;
use filter_bench_core::Outcome;
use filter_bench_core::ReportEntry;
use filter_bench_core::ReportSink;
use filter_bench_core::StrategySummary;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Formatting Helpers
// ============================================================================

/// Formats a duration as milliseconds with microsecond precision.
fn millis(duration: Duration) -> String {
    format!("{:.3} ms", duration.as_secs_f64() * 1_000.0)
}

/// Renders one entry as a text line.
fn entry_line(entry: &ReportEntry) -> String {
    match &entry.outcome {
        Outcome::Measured {
            duration,
            rows,
        } => format!(
            "{:<18} #{:<3} {:>14}  {rows} rows",
            entry.strategy,
            entry.iteration,
            millis(*duration)
        ),
        Outcome::Failed {
            kind,
            message,
        } => format!(
            "{:<18} #{:<3} FAILED ({kind}): {message} [no measurement]",
            entry.strategy, entry.iteration
        ),
    }
}

/// Renders one strategy summary as a text line.
fn summary_line(summary: &StrategySummary) -> String {
    let timing = match (summary.min, summary.mean, summary.max) {
        (Some(min), Some(mean), Some(max)) => {
            format!("min {} / mean {} / max {}", millis(min), millis(mean), millis(max))
        }
        _ => "no successful measurement".to_string(),
    };
    format!(
        "{:<18} measured {}, failed {}: {timing}",
        summary.strategy, summary.measured, summary.failed
    )
}

/// Converts a duration to whole microseconds, saturating.
fn whole_micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

/// Converts an optional duration to whole microseconds.
fn micros(duration: Option<Duration>) -> Value {
    duration.map_or(Value::Null, |value| json!(whole_micros(value)))
}

/// Builds the JSON document for a finished report.
#[must_use]
pub fn report_json(report: &BenchmarkReport) -> Value {
    let entries: Vec<Value> = report
        .entries()
        .iter()
        .map(|entry| match &entry.outcome {
            Outcome::Measured {
                duration,
                rows,
            } => json!({
                "strategy": entry.strategy,
                "iteration": entry.iteration,
                "status": "measured",
                "duration_us": whole_micros(*duration),
                "rows": rows,
            }),
            Outcome::Failed {
                kind,
                message,
            } => json!({
                "strategy": entry.strategy,
                "iteration": entry.iteration,
                "status": "failed",
                "error_kind": kind,
                "message": message,
            }),
        })
        .collect();
    let summaries: Vec<Value> = report
        .summaries()
        .iter()
        .map(|summary| {
            json!({
                "strategy": summary.strategy,
                "measured": summary.measured,
                "failed": summary.failed,
                "min_us": micros(summary.min),
                "mean_us": micros(summary.mean),
                "max_us": micros(summary.max),
            })
        })
        .collect();
    json!({
        "filter_size": report.filter_size(),
        "entries": entries,
        "summaries": summaries,
    })
}

// ============================================================================
// SECTION: Text Sink
// ============================================================================

/// Line-oriented human-readable report.
#[derive(Debug)]
pub struct TextReportSink<W: Write> {
    /// Output stream.
    out: W,
    /// First write failure, if any.
    error: Option<io::Error>,
}

impl<W: Write> TextReportSink<W> {
    /// Creates a sink writing to `out`.
    pub const fn new(out: W) -> Self {
        Self {
            out,
            error: None,
        }
    }

    /// Writes a line, keeping the first failure.
    fn line(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = writeln!(self.out, "{text}") {
            self.error = Some(err);
        }
    }

    /// Returns the output stream.
    ///
    /// # Errors
    ///
    /// Returns the first write error encountered while rendering.
    pub fn into_inner(self) -> io::Result<W> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.out),
        }
    }
}

impl<W: Write> ReportSink for TextReportSink<W> {
    fn record(&mut self, entry: &ReportEntry) {
        self.line(&entry_line(entry));
    }

    fn finish(&mut self, report: &BenchmarkReport) {
        self.line("");
        self.line(&format!("filter set: {} ids", report.filter_size()));
        for summary in report.summaries() {
            self.line(&summary_line(&summary));
        }
        if self.error.is_none()
            && let Err(err) = self.out.flush()
        {
            self.error = Some(err);
        }
    }
}

// ============================================================================
// SECTION: JSON Sink
// ============================================================================

/// Single-document JSON report.
#[derive(Debug)]
pub struct JsonReportSink<W: Write> {
    /// Output stream.
    out: W,
    /// First write failure, if any.
    error: Option<io::Error>,
}

impl<W: Write> JsonReportSink<W> {
    /// Creates a sink writing to `out`.
    pub const fn new(out: W) -> Self {
        Self {
            out,
            error: None,
        }
    }

    /// Returns the output stream.
    ///
    /// # Errors
    ///
    /// Returns the write error encountered while rendering.
    pub fn into_inner(self) -> io::Result<W> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.out),
        }
    }
}

impl<W: Write> ReportSink for JsonReportSink<W> {
    fn record(&mut self, _entry: &ReportEntry) {}

    fn finish(&mut self, report: &BenchmarkReport) {
        let document = report_json(report);
        let written = serde_json::to_writer_pretty(&mut self.out, &document)
            .map_err(io::Error::from)
            .and_then(|()| writeln!(self.out))
            .and_then(|()| self.out.flush());
        if let Err(err) = written {
            self.error = Some(err);
        }
    }
}
