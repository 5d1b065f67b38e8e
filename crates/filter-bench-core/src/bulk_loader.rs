// crates/filter-bench-core/src/bulk_loader.rs
// ============================================================================
// Module: Bulk Loader
// Description: Streams a filter set into the ephemeral relation via copy-in.
// Purpose: Load large id sets without one statement per id.
// Dependencies: postgres
// ============================================================================

//! ## Overview
//! The filter set is split into fixed-size batches of newline-delimited text
//! tuples and written through a single `COPY ... FROM STDIN` stream. Batch size
//! is a tunable constant and never depends on the filter set size. A failed
//! batch aborts the copy; the caller's transaction rolls back. Nothing retries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;
use std::io::Write as _;
use std::num::NonZeroUsize;

use postgres::GenericClient;

use crate::error::TransferError;
use crate::filter_set::FilterSet;
use crate::sql;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default number of ids written per copy batch.
pub const DEFAULT_COPY_BATCH_SIZE: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(size) => size,
    None => NonZeroUsize::MIN,
};

// ============================================================================
// SECTION: Loader
// ============================================================================

/// Copy-in loader for the join strategy's filter relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkLoader {
    /// Ids per batch.
    batch_size: NonZeroUsize,
}

impl Default for BulkLoader {
    fn default() -> Self {
        Self::new(DEFAULT_COPY_BATCH_SIZE)
    }
}

impl BulkLoader {
    /// Creates a loader writing `batch_size` ids per batch.
    #[must_use]
    pub const fn new(batch_size: NonZeroUsize) -> Self {
        Self {
            batch_size,
        }
    }

    /// Returns the batch size.
    #[must_use]
    pub const fn batch_size(self) -> NonZeroUsize {
        self.batch_size
    }

    /// Encodes the filter set as copy-in text batches.
    #[must_use]
    pub fn encode_batches(self, filter: &FilterSet) -> Vec<String> {
        filter
            .ids()
            .chunks(self.batch_size.get())
            .map(|chunk| {
                let mut batch = String::with_capacity(chunk.len() * 8);
                for id in chunk {
                    let _ = writeln!(batch, "{id}");
                }
                batch
            })
            .collect()
    }

    /// Streams the filter set into the ephemeral relation.
    ///
    /// Returns the number of batches written. The relation must already exist
    /// on `client`.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError`] when the copy cannot start, a batch fails, or
    /// the engine reports a different row count.
    pub fn load<C: GenericClient>(
        self,
        client: &mut C,
        filter: &FilterSet,
    ) -> Result<usize, TransferError> {
        let batches = self.encode_batches(filter);
        let mut writer = client
            .copy_in(sql::copy_ephemeral_relation().as_str())
            .map_err(|err| TransferError::Start(err.to_string()))?;
        for (batch, payload) in batches.iter().enumerate() {
            writer.write_all(payload.as_bytes()).map_err(|err| TransferError::Batch {
                batch,
                message: err.to_string(),
            })?;
        }
        let actual = writer.finish().map_err(|err| TransferError::Finish(err.to_string()))?;
        let expected = u64::try_from(filter.len()).unwrap_or(u64::MAX);
        if actual != expected {
            return Err(TransferError::RowCountMismatch {
                expected,
                actual,
            });
        }
        Ok(batches.len())
    }
}
