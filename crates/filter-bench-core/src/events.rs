// crates/filter-bench-core/src/events.rs
// ============================================================================
// Module: Benchmark Events
// Description: Structured JSON-line events for provisioning and strategy runs.
// Purpose: Emit machine-readable logs without a logging framework dependency.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every notable step of a benchmark (database lifecycle, seeding, strategy
//! start/finish/failure, bulk loads) is described by a [`BenchEvent`] and handed
//! to an [`EventSink`]. Sinks never fail the caller: write errors are dropped so
//! logging cannot disturb a measurement.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BenchEventKind {
    /// Benchmark database was (re)created.
    DatabaseCreated {
        /// Database name.
        database: String,
    },
    /// Benchmark database was dropped.
    DatabaseDropped {
        /// Database name.
        database: String,
    },
    /// Fact table is ready for seeding.
    FactTableReady {
        /// Whether the table was dropped and recreated.
        recreated: bool,
        /// Whether the account index exists.
        indexed: bool,
    },
    /// Seeding finished.
    SeedCompleted {
        /// Rows inserted.
        rows: u64,
        /// Elapsed milliseconds.
        duration_ms: u128,
    },
    /// A strategy iteration is starting.
    StrategyStarted {
        /// Strategy label.
        strategy: String,
        /// One-based iteration.
        iteration: u32,
        /// Filter set size.
        filter_size: usize,
    },
    /// A strategy iteration was measured.
    StrategyCompleted {
        /// Strategy label.
        strategy: String,
        /// One-based iteration.
        iteration: u32,
        /// Elapsed microseconds.
        duration_us: u128,
        /// Result rows returned.
        rows: usize,
    },
    /// A strategy iteration failed.
    StrategyFailed {
        /// Strategy label.
        strategy: String,
        /// One-based iteration.
        iteration: u32,
        /// Stable error label.
        error_kind: String,
        /// Error message.
        message: String,
    },
    /// The join strategy finished its copy-in.
    BulkLoadCompleted {
        /// Rows copied.
        rows: usize,
        /// Batches written.
        batches: usize,
    },
}

/// Timestamped benchmark event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchEvent {
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Event payload.
    #[serde(flatten)]
    pub kind: BenchEventKind,
}

impl BenchEvent {
    /// Creates an event stamped with the current time.
    #[must_use]
    pub fn new(kind: BenchEventKind) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            timestamp_ms,
            kind,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Destination for benchmark events.
pub trait EventSink {
    /// Records an event.
    fn record(&self, event: &BenchEvent);

    /// Stamps and records an event payload.
    fn emit(&self, kind: BenchEventKind) {
        self.record(&BenchEvent::new(kind));
    }
}

/// Event sink that logs JSON lines to stderr.
pub struct StderrEventSink;

impl EventSink for StderrEventSink {
    fn record(&self, event: &BenchEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Event sink that appends JSON lines to a file.
pub struct FileEventSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileEventSink {
    /// Opens the event log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl EventSink for FileEventSink {
    fn record(&self, event: &BenchEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op event sink.
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn record(&self, _event: &BenchEvent) {}
}
