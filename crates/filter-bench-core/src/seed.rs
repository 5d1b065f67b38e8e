// crates/filter-bench-core/src/seed.rs
// ============================================================================
// Module: Seed Generator
// Description: Synthetic request rows for the fact table.
// Purpose: Populate a benchmark database with a reproducible data volume.
// Dependencies: postgres, rand, time
// ============================================================================

//! ## Overview
//! [`SeedGenerator`] inserts `num_requests` random rows in multi-row `INSERT`
//! batches inside one transaction, so a failed seed leaves the table empty.
//! Accounts are drawn from `1..=num_accounts`, dates from
//! `[start_date, start_date + date_span_days)` and totals from
//! `min_total..=max_total`. Supplying `rng_seed` makes the data repeatable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::num::NonZeroUsize;
use std::time::Instant;

use postgres::Client;
use postgres::GenericClient;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use time::Date;
use time::Duration;
use time::macros::date;

use crate::error::ProvisioningError;
use crate::events::BenchEventKind;
use crate::events::EventSink;
use crate::model::RequestRecord;
use crate::sql;

// ============================================================================
// SECTION: Seed Spec
// ============================================================================

/// Default rows per `INSERT` statement.
pub const DEFAULT_SEED_BATCH_SIZE: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(size) => size,
    None => NonZeroUsize::MIN,
};

/// Invalid seed parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeedSpecError {
    /// No accounts to draw from.
    #[error("seed num_accounts must be greater than zero")]
    NoAccounts,
    /// Empty date range.
    #[error("seed date_span_days must be greater than zero")]
    EmptyDateSpan,
    /// Date range runs past the calendar.
    #[error("seed date range starting {0} overflows the calendar")]
    DateOverflow(Date),
    /// Totals violate the non-negative check.
    #[error("seed min_total must be non-negative, got {0}")]
    NegativeTotal(i32),
    /// Totals range is inverted.
    #[error("seed min_total {min} exceeds max_total {max}")]
    InvertedTotals {
        /// Lower bound.
        min: i32,
        /// Upper bound.
        max: i32,
    },
}

/// Synthetic data parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSpec {
    /// Accounts `1..=num_accounts`.
    pub num_accounts: u32,
    /// Rows to insert.
    pub num_requests: u64,
    /// First request date.
    pub start_date: Date,
    /// Number of distinct dates.
    pub date_span_days: u32,
    /// Smallest total (inclusive).
    pub min_total: i32,
    /// Largest total (inclusive).
    pub max_total: i32,
    /// Rows per `INSERT` statement.
    pub batch_size: NonZeroUsize,
    /// Optional RNG seed for repeatable data.
    pub rng_seed: Option<u64>,
}

impl Default for SeedSpec {
    fn default() -> Self {
        Self {
            num_accounts: 5_000,
            num_requests: 500_000,
            start_date: date!(2015 - 11 - 01),
            date_span_days: 30,
            min_total: 100,
            max_total: 10_001,
            batch_size: DEFAULT_SEED_BATCH_SIZE,
            rng_seed: None,
        }
    }
}

impl SeedSpec {
    /// Validates the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SeedSpecError`] describing the first invalid field.
    pub fn validate(&self) -> Result<(), SeedSpecError> {
        if self.num_accounts == 0 {
            return Err(SeedSpecError::NoAccounts);
        }
        if self.date_span_days == 0 {
            return Err(SeedSpecError::EmptyDateSpan);
        }
        if self.last_date().is_none() {
            return Err(SeedSpecError::DateOverflow(self.start_date));
        }
        if self.min_total < 0 {
            return Err(SeedSpecError::NegativeTotal(self.min_total));
        }
        if self.min_total > self.max_total {
            return Err(SeedSpecError::InvertedTotals {
                min: self.min_total,
                max: self.max_total,
            });
        }
        Ok(())
    }

    /// Last date in the range, if representable.
    fn last_date(&self) -> Option<Date> {
        self.start_date.checked_add(Duration::days(i64::from(self.date_span_days) - 1))
    }
}

// ============================================================================
// SECTION: Generator
// ============================================================================

/// Fact table seeder.
#[derive(Debug, Clone, Copy)]
pub struct SeedGenerator {
    /// Validated parameters.
    spec: SeedSpec,
}

impl SeedGenerator {
    /// Creates a generator for `spec`.
    ///
    /// # Errors
    ///
    /// Returns [`SeedSpecError`] when `spec` is invalid.
    pub fn new(spec: SeedSpec) -> Result<Self, SeedSpecError> {
        spec.validate()?;
        Ok(Self {
            spec,
        })
    }

    /// Returns the parameters.
    #[must_use]
    pub const fn spec(&self) -> &SeedSpec {
        &self.spec
    }

    /// Builds the RNG: seeded when `rng_seed` is set, from entropy otherwise.
    #[must_use]
    pub fn rng(&self) -> StdRng {
        self.spec.rng_seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
    }

    /// Draws one random row.
    pub fn record<R: Rng + ?Sized>(&self, rng: &mut R) -> RequestRecord {
        let offset = rng.gen_range(0 .. self.spec.date_span_days);
        let request_date = self
            .spec
            .start_date
            .checked_add(Duration::days(i64::from(offset)))
            .unwrap_or(self.spec.start_date);
        RequestRecord {
            account_id: i64::from(rng.gen_range(1 ..= self.spec.num_accounts)),
            request_date,
            total: rng.gen_range(self.spec.min_total ..= self.spec.max_total),
        }
    }

    /// Inserts `num_requests` random rows in one transaction.
    ///
    /// Returns the number of rows inserted.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningError::Seed`] when any insert or the commit fails.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        client: &mut Client,
        rng: &mut R,
        events: &dyn EventSink,
    ) -> Result<u64, ProvisioningError> {
        let started = Instant::now();
        let batch_size = u64::try_from(self.spec.batch_size.get()).unwrap_or(u64::MAX);
        let mut tx = client.transaction().map_err(|err| ProvisioningError::Seed(err.to_string()))?;
        let mut inserted = 0_u64;
        let mut batch = Vec::with_capacity(self.spec.batch_size.get());
        while inserted < self.spec.num_requests {
            let remaining = (self.spec.num_requests - inserted).min(batch_size);
            batch.clear();
            for _ in 0 .. remaining {
                batch.push(self.record(rng));
            }
            inserted += insert_requests(&mut tx, &batch)?;
        }
        tx.commit().map_err(|err| ProvisioningError::Seed(err.to_string()))?;
        events.emit(BenchEventKind::SeedCompleted {
            rows: inserted,
            duration_ms: started.elapsed().as_millis(),
        });
        Ok(inserted)
    }
}

/// Inserts exact rows with one multi-row statement.
///
/// Returns the number of rows inserted.
///
/// # Errors
///
/// Returns [`ProvisioningError::Seed`] when the insert fails.
pub fn insert_requests<C: GenericClient>(
    client: &mut C,
    records: &[RequestRecord],
) -> Result<u64, ProvisioningError> {
    if records.is_empty() {
        return Ok(0);
    }
    client
        .execute(sql::insert_requests(records).as_str(), &[])
        .map_err(|err| ProvisioningError::Seed(err.to_string()))
}
