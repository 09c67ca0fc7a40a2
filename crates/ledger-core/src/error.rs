//! # Validation Errors
//!
//! Structured errors for the input shape checks that run before any
//! ledger access. Each variant names the specific defect so operators can
//! tell a missing field from a mistyped one in the logs, even though callers
//! only ever see a single generic "invalid credential format" message.

use thiserror::Error;

/// Reasons a submitted credential is rejected before reaching the ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The request carried no `credential` member (or it was `null`).
    #[error("request has no credential")]
    MissingCredential,

    /// The `credential` member is not a JSON object.
    #[error("credential must be a JSON object")]
    NotAnObject,

    /// The credential object has no `id` property.
    #[error("credential has no id property")]
    MissingId,

    /// The `id` property is present but is not a JSON string.
    #[error("credential id must be a string")]
    IdNotString,

    /// The `id` property is the empty string.
    #[error("credential id must be non-empty")]
    EmptyId,

    /// The `id` property exceeds the maximum accepted length.
    #[error("credential id is {len} bytes, exceeding the {max}-byte limit")]
    IdTooLong {
        /// Length of the rejected identifier in bytes.
        len: usize,
        /// Maximum accepted length in bytes.
        max: usize,
    },

    /// The request body or credential could not be parsed as JSON.
    #[error("malformed JSON: {0}")]
    MalformedJson(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_too_long_display_names_both_lengths() {
        let err = ValidationError::IdTooLong { len: 2000, max: 1024 };
        let msg = err.to_string();
        assert!(msg.contains("2000"));
        assert!(msg.contains("1024"));
    }

    #[test]
    fn malformed_json_carries_parser_message() {
        let err = ValidationError::MalformedJson("EOF while parsing".into());
        assert!(err.to_string().contains("EOF while parsing"));
    }
}
