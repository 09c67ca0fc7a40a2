//! Store error types and result alias.
//!
//! Every backend maps its internal failures onto [`StoreError`]. A
//! `StoreError` from `insert_if_absent` always means the ledger was left
//! unchanged; callers never need to clean up after one.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for ledger store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur inside a ledger store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem I/O failed.
    #[error("I/O error while {context}: {source}")]
    Io {
        /// What the store was doing when the error occurred.
        context: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Records could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The relational backend reported an error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migrations could not be applied.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The writer lock could not be acquired in time.
    #[error("timed out after {waited:?} waiting for ledger lock {}", path.display())]
    LockTimeout {
        /// Path of the lock file.
        path: PathBuf,
        /// How long acquisition was attempted.
        waited: Duration,
    },

    /// Persisted state violates a ledger invariant.
    #[error("ledger is corrupt: {reason}")]
    Corrupt {
        /// Description of the violation.
        reason: String,
    },
}

impl StoreError {
    /// Build an I/O error with a description of the failed step.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
