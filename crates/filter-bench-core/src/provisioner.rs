// crates/filter-bench-core/src/provisioner.rs
// ============================================================================
// Module: Schema Provisioner
// Description: Database, fact table, and index lifecycle management.
// Purpose: Prepare a reproducible schema and tear it down after a run.
// Dependencies: postgres, crate::sql, crate::events
// ============================================================================

//! ## Overview
//! [`EphemeralDatabase`] owns the benchmark database for the length of a run:
//! it is dropped and recreated on creation and dropped again on
//! [`EphemeralDatabase::finish`] (or best-effort when the guard is abandoned).
//! [`SchemaProvisioner`] manages the fact table and its account index on a
//! connection to that database. Every failure here is fatal to the run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use postgres::Client;

use crate::connection::ConnectionProvider;
use crate::error::ProvisioningError;
use crate::events::BenchEventKind;
use crate::events::EventSink;
use crate::model::ACCOUNT_INDEX;
use crate::model::EPHEMERAL_RELATION;
use crate::model::FACT_TABLE;
use crate::sql;

// ============================================================================
// SECTION: Identifiers
// ============================================================================

/// Maximum identifier length accepted by the engine.
const MAX_IDENTIFIER_LEN: usize = 63;

/// Validates a name interpolated into DDL.
///
/// Accepts `[a-z_][a-z0-9_]{0,62}`.
///
/// # Errors
///
/// Returns [`ProvisioningError::InvalidIdentifier`] for any other input.
pub fn validate_identifier(name: &str) -> Result<(), ProvisioningError> {
    let mut chars = name.chars();
    let valid_start = chars.next().is_some_and(|ch| ch.is_ascii_lowercase() || ch == '_');
    let valid_rest = chars.all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_');
    if !valid_start || !valid_rest || name.len() > MAX_IDENTIFIER_LEN {
        return Err(ProvisioningError::InvalidIdentifier(name.to_string()));
    }
    Ok(())
}

// ============================================================================
// SECTION: Ephemeral Database
// ============================================================================

/// Guard owning the benchmark database for one run.
pub struct EphemeralDatabase<'a> {
    /// Maintenance connection used for create and drop.
    maintenance: Client,
    /// Database name.
    name: String,
    /// Event sink.
    events: &'a dyn EventSink,
    /// Whether [`Self::finish`] already ran.
    finished: bool,
}

impl<'a> EphemeralDatabase<'a> {
    /// Drops any leftover database with the provider's name and creates it.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningError`] when the name is invalid, the
    /// maintenance connection fails, or the DDL fails.
    pub fn create(
        provider: &dyn ConnectionProvider,
        events: &'a dyn EventSink,
    ) -> Result<Self, ProvisioningError> {
        let name = provider.database_name().to_string();
        validate_identifier(&name)?;
        let mut maintenance = provider.connect_maintenance()?;
        maintenance
            .batch_execute(&sql::drop_database(&name))
            .map_err(|err| ProvisioningError::Database(err.to_string()))?;
        maintenance
            .batch_execute(&sql::create_database(&name))
            .map_err(|err| ProvisioningError::Database(err.to_string()))?;
        events.emit(BenchEventKind::DatabaseCreated {
            database: name.clone(),
        });
        Ok(Self {
            maintenance,
            name,
            events,
            finished: false,
        })
    }

    /// Returns the database name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ends the run, dropping the database unless `keep` is set.
    ///
    /// Connections to the database should be closed first.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningError::Database`] when the drop fails.
    pub fn finish(mut self, keep: bool) -> Result<(), ProvisioningError> {
        self.finished = true;
        if keep {
            return Ok(());
        }
        self.drop_database()
    }

    /// Drops the database and reports it.
    fn drop_database(&mut self) -> Result<(), ProvisioningError> {
        self.maintenance
            .batch_execute(&sql::drop_database(&self.name))
            .map_err(|err| ProvisioningError::Database(err.to_string()))?;
        self.events.emit(BenchEventKind::DatabaseDropped {
            database: self.name.clone(),
        });
        Ok(())
    }
}

impl Drop for EphemeralDatabase<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.drop_database();
        }
    }
}

// ============================================================================
// SECTION: Schema Provisioner
// ============================================================================

/// Fact table preparation options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactTableOptions {
    /// Drop and recreate the table (discarding rows).
    pub recreate: bool,
    /// Maintain the btree index on `account_id`.
    pub index: bool,
}

impl Default for FactTableOptions {
    fn default() -> Self {
        Self {
            recreate: true,
            index: true,
        }
    }
}

/// Fact table and index management on one connection.
pub struct SchemaProvisioner<'a> {
    /// Connection to the benchmark database.
    client: &'a mut Client,
    /// Event sink.
    events: &'a dyn EventSink,
}

impl<'a> SchemaProvisioner<'a> {
    /// Creates a provisioner on `client`.
    pub fn new(client: &'a mut Client, events: &'a dyn EventSink) -> Self {
        Self {
            client,
            events,
        }
    }

    /// Runs schema DDL.
    fn execute_ddl(&mut self, ddl: &str) -> Result<(), ProvisioningError> {
        self.client.batch_execute(ddl).map_err(|err| ProvisioningError::Schema(err.to_string()))
    }

    /// Creates the fact table when missing.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningError::Schema`] when the DDL fails.
    pub fn ensure_fact_table(&mut self) -> Result<(), ProvisioningError> {
        self.execute_ddl(&sql::create_fact_table())
    }

    /// Drops and recreates the fact table.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningError::Schema`] when the DDL fails.
    pub fn reset_fact_table(&mut self) -> Result<(), ProvisioningError> {
        self.execute_ddl(&sql::drop_fact_table())?;
        self.execute_ddl(&sql::create_fact_table())
    }

    /// Creates or drops the account index.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningError::Schema`] when the DDL fails.
    pub fn set_account_index(&mut self, enabled: bool) -> Result<(), ProvisioningError> {
        if enabled {
            self.execute_ddl(&sql::create_account_index())
        } else {
            self.execute_ddl(&sql::drop_account_index())
        }
    }

    /// Brings the fact table to the requested shape.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningError::Schema`] when any DDL fails.
    pub fn prepare(&mut self, options: FactTableOptions) -> Result<(), ProvisioningError> {
        if options.recreate {
            self.reset_fact_table()?;
        } else {
            self.ensure_fact_table()?;
        }
        self.set_account_index(options.index)?;
        self.events.emit(BenchEventKind::FactTableReady {
            recreated: options.recreate,
            indexed: options.index,
        });
        Ok(())
    }

    /// Refreshes planner statistics.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningError::Schema`] when `ANALYZE` fails.
    pub fn analyze_fact_table(&mut self) -> Result<(), ProvisioningError> {
        self.execute_ddl(&sql::analyze_fact_table())
    }

    /// Returns whether the fact table exists.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningError::Schema`] when the catalog query fails.
    pub fn fact_table_exists(&mut self) -> Result<bool, ProvisioningError> {
        relation_exists(self.client, FACT_TABLE)
    }

    /// Returns whether the account index exists.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningError::Schema`] when the catalog query fails.
    pub fn account_index_exists(&mut self) -> Result<bool, ProvisioningError> {
        relation_exists(self.client, ACCOUNT_INDEX)
    }

    /// Counts filter relations currently visible in any session.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningError::Schema`] when the catalog query fails.
    pub fn ephemeral_relation_count(&mut self) -> Result<i64, ProvisioningError> {
        ephemeral_relation_count(self.client)
    }
}

/// Returns whether a permanent relation named `name` exists.
fn relation_exists(client: &mut Client, name: &str) -> Result<bool, ProvisioningError> {
    let row = client
        .query_one(sql::permanent_relation_exists(), &[&name])
        .map_err(|err| ProvisioningError::Schema(err.to_string()))?;
    row.try_get(0).map_err(|err| ProvisioningError::Schema(err.to_string()))
}

/// Counts temporary relations named like the filter relation.
///
/// Usable from any connection, including one not owned by a provisioner.
///
/// # Errors
///
/// Returns [`ProvisioningError::Schema`] when the catalog query fails.
pub fn ephemeral_relation_count(client: &mut Client) -> Result<i64, ProvisioningError> {
    let row = client
        .query_one(sql::count_ephemeral_relations(), &[&EPHEMERAL_RELATION])
        .map_err(|err| ProvisioningError::Schema(err.to_string()))?;
    row.try_get(0).map_err(|err| ProvisioningError::Schema(err.to_string()))
}
