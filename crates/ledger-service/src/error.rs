//! Service-layer errors.

use ledger_core::ValidationError;
use ledger_store::StoreError;
use thiserror::Error;

/// Failure of an issuance or verification request.
///
/// `Conflict` and `NotFound` are ordinary outcomes, not errors; see
/// [`IssueOutcome`](crate::IssueOutcome) and
/// [`VerifyOutcome`](crate::VerifyOutcome).
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The submitted credential was rejected before any store access.
    #[error("invalid credential: {0}")]
    InvalidInput(#[from] ValidationError),

    /// The ledger failed; nothing was recorded.
    #[error("ledger failure: {0}")]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Whether the caller is at fault.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}
