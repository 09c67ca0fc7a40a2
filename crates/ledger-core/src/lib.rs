#![deny(missing_docs)]

//! # ledger-core: Foundational Types for the Credential Ledger
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies; it uses only `serde`, `serde_json`,
//! `thiserror`, and `chrono` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** A [`CredentialId`] cannot be
//!    passed where an [`IssuerId`] is expected, and a `CredentialId` can only
//!    be obtained through validation.
//!
//! 2. **Validation happens once, at the edge.** Untyped request bodies become
//!    a [`SubmittedCredential`] before they reach the service layer. Nothing
//!    downstream re-checks the shape of the input.
//!
//! 3. **Payloads are opaque.** The submitted credential is carried as the
//!    exact JSON text the caller sent. The ledger never re-serializes it.
//!
//! 4. **Structured errors.** [`ValidationError`] is a `thiserror` enum, with no
//!    `Box<dyn Error>`, no `.unwrap()` outside tests.

pub mod credential;
pub mod error;
pub mod identity;
pub mod record;
pub mod temporal;

// Re-export primary types at crate root for ergonomic imports.
pub use credential::{CredentialEnvelope, SubmittedCredential};
pub use error::ValidationError;
pub use identity::{CredentialId, IssuerId, MAX_CREDENTIAL_ID_LEN};
pub use record::{IssuanceMetadata, Record};
pub use temporal::Timestamp;
