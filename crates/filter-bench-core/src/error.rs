// crates/filter-bench-core/src/error.rs
// ============================================================================
// Module: Benchmark Errors
// Description: Error taxonomy for provisioning, strategies, and bulk transfer.
// Purpose: Separate fatal failures from per-strategy recorded failures.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! [`ProvisioningError`] is fatal to a run. [`StrategyError`] is caught by the
//! runner and recorded against the failing strategy. [`TransferError`] always
//! escalates to a rollback of the join strategy's transaction.

// ============================================================================
// SECTION: Imports
// ============================================================================

use postgres::error::SqlState;
use thiserror::Error;

// ============================================================================
// SECTION: Connection Errors
// ============================================================================

/// Connection provider errors.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// Connection settings are unusable.
    #[error("connection config error: {0}")]
    Config(String),
    /// The engine refused or dropped the connection.
    #[error("postgres connection error: {0}")]
    Connect(String),
}

// ============================================================================
// SECTION: Provisioning Errors
// ============================================================================

/// Database, table, index, or seed provisioning failed.
#[derive(Debug, Error)]
pub enum ProvisioningError {
    /// Connection could not be established.
    #[error("provisioning connection error: {0}")]
    Connection(#[from] ConnectionError),
    /// Identifier cannot be used in DDL.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
    /// Database create or drop failed.
    #[error("database provisioning error: {0}")]
    Database(String),
    /// Table or index DDL failed.
    #[error("schema provisioning error: {0}")]
    Schema(String),
    /// Seeding the fact table failed.
    #[error("seed error: {0}")]
    Seed(String),
}

// ============================================================================
// SECTION: Transfer Errors
// ============================================================================

/// Bulk copy-in failed.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The `COPY ... FROM STDIN` handshake failed.
    #[error("copy-in start failed: {0}")]
    Start(String),
    /// Writing a batch into the copy stream failed.
    #[error("copy-in batch {batch} failed: {message}")]
    Batch {
        /// Zero-based batch index.
        batch: usize,
        /// Engine or I/O message.
        message: String,
    },
    /// Completing the copy failed (constraint violations surface here).
    #[error("copy-in finish failed: {0}")]
    Finish(String),
    /// Engine reported a different row count than was sent.
    #[error("copy-in row count mismatch: expected {expected}, got {actual}")]
    RowCountMismatch {
        /// Rows sent.
        expected: u64,
        /// Rows reported by the engine.
        actual: u64,
    },
}

// ============================================================================
// SECTION: Strategy Errors
// ============================================================================

/// A single strategy execution failed.
#[derive(Debug, Error)]
pub enum StrategyError {
    /// Query text exceeded the statement-size limit.
    #[error("{strategy} statement is {actual} bytes, limit is {limit}")]
    StatementTooLarge {
        /// Strategy label.
        strategy: &'static str,
        /// Configured limit in bytes.
        limit: usize,
        /// Statement size in bytes.
        actual: usize,
    },
    /// The engine rejected the statement as exceeding one of its limits.
    #[error("{strategy} statement of {actual} bytes rejected by the engine: {message}")]
    StatementRejected {
        /// Strategy label.
        strategy: &'static str,
        /// Statement size in bytes.
        actual: usize,
        /// Engine message.
        message: String,
    },
    /// The aggregate query failed.
    #[error("query failed: {0}")]
    Query(String),
    /// Transaction begin/DDL/commit failed.
    #[error("transaction failed: {0}")]
    Transaction(String),
    /// Bulk transfer failed.
    #[error(transparent)]
    Transfer(#[from] TransferError),
    /// A result row had an unexpected shape.
    #[error("result decode failed: {0}")]
    Decode(String),
}

impl StrategyError {
    /// Returns a stable label for reports and events.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::StatementTooLarge {
                ..
            }
            | Self::StatementRejected {
                ..
            } => "statement_too_large",
            Self::Query(_) => "query",
            Self::Transaction(_) => "transaction",
            Self::Transfer(_) => "transfer",
            Self::Decode(_) => "decode",
        }
    }

    /// Maps an engine error raised by a filter query of `actual` bytes.
    pub(crate) fn from_query(strategy: &'static str, actual: usize, err: &postgres::Error) -> Self {
        let message =
            err.as_db_error().map_or_else(|| err.to_string(), |db| db.message().to_string());
        Self::from_engine(strategy, actual, err.code(), message)
    }

    /// Maps an engine SQLSTATE and message for a filter query of `actual` bytes.
    pub(crate) fn from_engine(
        strategy: &'static str,
        actual: usize,
        code: Option<&SqlState>,
        message: String,
    ) -> Self {
        if code == Some(&SqlState::PROGRAM_LIMIT_EXCEEDED) {
            Self::StatementRejected {
                strategy,
                actual,
                message,
            }
        } else {
            Self::Query(message)
        }
    }
}
