//! Error types for royalty operations

use mintmatrix_domain::DomainError;
use thiserror::Error;

/// Errors that can occur while querying or claiming revenue
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoyaltyError {
    /// Request rejected before anything was sent
    #[error("Invalid claim request: {0}")]
    Validation(String),

    /// Gateway could not be reached
    #[error("Gateway communication error: {0}")]
    Communication(String),

    /// Gateway answered with a non-success status
    #[error("Gateway returned HTTP {status}: {body}")]
    Status {
        /// Status code
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// Gateway response did not have the expected shape
    #[error("Invalid gateway response: {0}")]
    InvalidResponse(String),
}

impl From<DomainError> for RoyaltyError {
    fn from(e: DomainError) -> Self {
        RoyaltyError::Validation(e.to_string())
    }
}

impl From<reqwest::Error> for RoyaltyError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RoyaltyError::InvalidResponse(e.to_string())
        } else {
            RoyaltyError::Communication(e.to_string())
        }
    }
}

impl From<serde_json::Error> for RoyaltyError {
    fn from(e: serde_json::Error) -> Self {
        RoyaltyError::InvalidResponse(format!("JSON parsing error: {}", e))
    }
}
