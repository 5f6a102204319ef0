//! Error types for domain validation

use thiserror::Error;

/// Errors raised while validating domain values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Address is not 20 bytes of hex
    #[error("Invalid address '{0}': expected 40 hex digits with optional 0x prefix")]
    InvalidAddress(String),

    /// Token name does not match a known royalty token
    #[error("Unknown royalty token: {0}")]
    UnknownToken(String),

    /// Child ip ids and royalty policies must pair up one to one
    #[error("Claim lists differ in length: {child_ip_ids} child ip ids, {royalty_policies} royalty policies")]
    MismatchedClaimLists {
        /// Number of child ip ids supplied
        child_ip_ids: usize,
        /// Number of royalty policies supplied
        royalty_policies: usize,
    },

    /// A required field was missing or empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}
