// system-tests/tests/helpers/fixtures.rs
// ============================================================================
// Module: Benchmark Database Fixtures
// Description: Per-test benchmark databases with exact fact rows.
// Purpose: Give each test an isolated, provisioned database and observers.
// Dependencies: filter-bench-core, postgres, time
// ============================================================================

//! ## Overview
//! [`BenchDatabase`] wraps the core [`EphemeralDatabase`] guard with a
//! prepared fact table. [`CaptureEvents`] keeps emitted events for
//! assertions. Catalog probes always run on a fresh connection.

use std::process;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use filter_bench_core::BenchEvent;
use filter_bench_core::BenchEventKind;
use filter_bench_core::ConnectionProvider;
use filter_bench_core::EphemeralDatabase;
use filter_bench_core::EventSink;
use filter_bench_core::FactTableOptions;
use filter_bench_core::NoopEventSink;
use filter_bench_core::PostgresConnectionProvider;
use filter_bench_core::RequestRecord;
use filter_bench_core::SchemaProvisioner;
use filter_bench_core::provisioner::ephemeral_relation_count;
use filter_bench_core::seed::insert_requests;
use postgres::Client;
use time::macros::date;

use super::infra::PostgresFixture;

/// Event sink shared by fixtures that do not inspect events.
pub static NO_EVENTS: NoopEventSink = NoopEventSink;

/// Counter making database names unique within a test binary.
static NEXT_DATABASE: AtomicUsize = AtomicUsize::new(0);

/// Returns a database name unique to this process and call.
pub fn unique_database_name(suite: &str) -> String {
    let index = NEXT_DATABASE.fetch_add(1, Ordering::SeqCst);
    format!("fb_{suite}_{}_{index}", process::id())
}

/// Builds a fact row dated at the start of the seed range.
pub const fn request(account_id: i64, total: i32) -> RequestRecord {
    RequestRecord {
        account_id,
        request_date: date!(2015 - 11 - 01),
        total,
    }
}

/// Benchmark database with a prepared fact table, dropped on `finish`.
pub struct BenchDatabase {
    /// Provider targeting this database.
    pub provider: PostgresConnectionProvider,
    /// Guard dropping the database; taken by `finish`.
    guard: Option<EphemeralDatabase<'static>>,
}

impl BenchDatabase {
    /// Creates a database with an indexed, empty fact table.
    pub fn create(fixture: &PostgresFixture, suite: &str) -> Result<Self, String> {
        let provider = fixture.provider(&unique_database_name(suite))?;
        let guard =
            EphemeralDatabase::create(&provider, &NO_EVENTS).map_err(|err| err.to_string())?;
        let database = Self {
            provider,
            guard: Some(guard),
        };
        let mut client = database.connect()?;
        SchemaProvisioner::new(&mut client, &NO_EVENTS)
            .prepare(FactTableOptions::default())
            .map_err(|err| err.to_string())?;
        Ok(database)
    }

    /// Benchmark database name.
    pub fn name(&self) -> &str {
        self.provider.database_name()
    }

    /// Opens a connection to the benchmark database.
    pub fn connect(&self) -> Result<Client, String> {
        self.provider.connect().map_err(|err| err.to_string())
    }

    /// Inserts exact fact rows.
    pub fn insert(&self, records: &[RequestRecord]) -> Result<(), String> {
        let mut client = self.connect()?;
        insert_requests(&mut client, records).map_err(|err| err.to_string())?;
        SchemaProvisioner::new(&mut client, &NO_EVENTS)
            .analyze_fact_table()
            .map_err(|err| err.to_string())
    }

    /// Counts filter relations visible from a fresh session.
    pub fn ephemeral_relations(&self) -> Result<i64, String> {
        let mut observer = self.connect()?;
        ephemeral_relation_count(&mut observer).map_err(|err| err.to_string())
    }

    /// Drops the database.
    pub fn finish(mut self) -> Result<(), String> {
        match self.guard.take() {
            Some(guard) => guard.finish(false).map_err(|err| err.to_string()),
            None => Ok(()),
        }
    }
}

/// Returns whether database `name` exists on the server.
pub fn database_exists(fixture: &PostgresFixture, name: &str) -> Result<bool, String> {
    let provider = fixture.provider("filter_bench_probe")?;
    let mut client = provider.connect_maintenance().map_err(|err| err.to_string())?;
    let row = client
        .query_one("SELECT EXISTS (SELECT 1 FROM pg_catalog.pg_database WHERE datname = $1)", &[
            &name,
        ])
        .map_err(|err| err.to_string())?;
    row.try_get(0).map_err(|err| err.to_string())
}

/// Event sink that keeps every event.
#[derive(Default)]
pub struct CaptureEvents {
    /// Events in emission order.
    events: Mutex<Vec<BenchEvent>>,
}

impl CaptureEvents {
    /// Returns captured payloads in emission order.
    pub fn kinds(&self) -> Vec<BenchEventKind> {
        self.events
            .lock()
            .map(|events| events.iter().map(|event| event.kind.clone()).collect())
            .unwrap_or_default()
    }
}

impl EventSink for CaptureEvents {
    fn record(&self, event: &BenchEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
