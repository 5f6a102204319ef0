//! Retry policy for read-only API calls
//!
//! The policy is injected into the client rather than hardcoded in each
//! fetch loop, so tests can swap in [`RetryPolicy::immediate`] and exhaust
//! retries without waiting on real timers. Writes (claims) never go through
//! this path.

use crate::StoryError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Default number of attempts, first try included
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default linear backoff step
pub const DEFAULT_BACKOFF_STEP_MS: u64 = 1000;

/// Delay schedule between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Retry immediately
    None,
    /// Same delay after every failure
    Fixed(Duration),
    /// `step * attempt` after the given failed attempt
    Linear(Duration),
}

impl Backoff {
    /// Delay to wait after `attempt` (1-based) failed
    pub fn delay(&self, attempt: u32) -> Duration {
        match self {
            Backoff::None => Duration::ZERO,
            Backoff::Fixed(d) => *d,
            Backoff::Linear(step) => step.saturating_mul(attempt),
        }
    }
}

/// Max attempts, backoff schedule and a retryable-error predicate
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Backoff,
    retryable: fn(&StoryError) -> bool,
}

impl RetryPolicy {
    /// Policy with the default predicate ([`StoryError::is_retryable`])
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
            retryable: StoryError::is_retryable,
        }
    }

    /// `max_attempts` tries with `step * attempt` between them
    pub fn linear(max_attempts: u32, step: Duration) -> Self {
        Self::new(max_attempts, Backoff::Linear(step))
    }

    /// No waiting between attempts
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Backoff::None)
    }

    /// A single attempt
    pub fn never() -> Self {
        Self::immediate(1)
    }

    /// Replace the retryable-error predicate
    pub fn with_predicate(mut self, retryable: fn(&StoryError) -> bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// Attempts allowed, first try included
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Backoff schedule
    pub fn backoff(&self) -> Backoff {
        self.backoff
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget runs out
    ///
    /// `op` receives the 1-based attempt number. Non-retryable errors are
    /// returned as-is; exhaustion wraps the last error in
    /// [`StoryError::RetriesExhausted`].
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, StoryError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, StoryError>>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if !(self.retryable)(&e) => return Err(e),
                Err(e) if attempt >= self.max_attempts => {
                    return Err(StoryError::RetriesExhausted {
                        attempts: attempt,
                        last: Box::new(e),
                    });
                }
                Err(e) => {
                    let delay = self.backoff.delay(attempt);
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Request failed, retrying"
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    /// 3 attempts, linear backoff of attempt x 1s
    fn default() -> Self {
        Self::linear(
            DEFAULT_MAX_ATTEMPTS,
            Duration::from_millis(DEFAULT_BACKOFF_STEP_MS),
        )
    }
}

/// Retry settings as they appear in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Attempts, first try included
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Linear backoff step in milliseconds; 0 disables waiting
    #[serde(default = "default_backoff_step_ms")]
    pub backoff_step_ms: u64,
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_backoff_step_ms() -> u64 {
    DEFAULT_BACKOFF_STEP_MS
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_step_ms: DEFAULT_BACKOFF_STEP_MS,
        }
    }
}

impl RetryConfig {
    /// Build the policy this config describes
    pub fn to_policy(&self) -> RetryPolicy {
        if self.backoff_step_ms == 0 {
            RetryPolicy::immediate(self.max_attempts)
        } else {
            RetryPolicy::linear(
                self.max_attempts,
                Duration::from_millis(self.backoff_step_ms),
            )
        }
    }
}
