//! Error types for Story Protocol API calls

use thiserror::Error;

/// Errors that can occur while talking to the Story Protocol API
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoryError {
    /// Network failure before a status was received
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Status {
        /// Status code
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Request could not be built (bad header value, bad URL)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Every attempt allowed by the retry policy failed
    #[error("Gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Attempts made
        attempts: u32,
        /// Error from the final attempt
        last: Box<StoryError>,
    },
}

impl StoryError {
    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            StoryError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 404 from the API
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// 400 from the API
    pub fn is_bad_request(&self) -> bool {
        self.status() == Some(400)
    }

    /// Default retry predicate
    ///
    /// Transport failures and unexpected statuses are worth another attempt.
    /// 400 and 404 carry meaning for the caller, and a malformed body will
    /// not fix itself.
    pub fn is_retryable(&self) -> bool {
        match self {
            StoryError::Transport(_) => true,
            StoryError::Status { status, .. } => !matches!(status, 400 | 404),
            StoryError::InvalidResponse(_)
            | StoryError::InvalidRequest(_)
            | StoryError::RetriesExhausted { .. } => false,
        }
    }
}

impl From<reqwest::Error> for StoryError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            StoryError::InvalidRequest(e.to_string())
        } else if e.is_decode() {
            StoryError::InvalidResponse(e.to_string())
        } else {
            StoryError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for StoryError {
    fn from(e: serde_json::Error) -> Self {
        StoryError::InvalidResponse(format!("JSON parsing error: {}", e))
    }
}
