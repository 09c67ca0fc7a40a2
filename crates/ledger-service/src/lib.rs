//! # ledger-service: Issuance and Verification
//!
//! The two stateless request handlers that sit between the HTTP surface and
//! the [`LedgerStore`](ledger_store::LedgerStore):
//!
//! - [`IssuanceService`] records a credential exactly once and reports which
//!   worker issued it.
//! - [`VerificationService`] reports who issued a credential and when.
//!
//! Both validate the submitted credential before touching the store, so a
//! malformed request never reaches persistence.

pub mod error;
pub mod host;
pub mod issuance;
pub mod verification;

pub use error::ServiceError;
pub use host::{hostname, resolve_issuer_id};
pub use issuance::{IssuanceService, IssueOutcome};
pub use verification::{VerificationService, VerifyOutcome};
