//! Bounded retry for connection-level failures
//!
//! Only [`TransportError::Connection`] is retried. A received response of any
//! status ends the loop immediately. The backoff delay is slept after every
//! connection failure, including the last one, so five failed attempts with
//! the default policy block the caller for 15 seconds in total.

use std::fmt;
use std::time::Duration;

use rocketfuel_domain::constants::{
    DEFAULT_BACKOFF_BASE, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_BACKOFF_MS, DEFAULT_RETRY_DELAY_MS,
};
use rocketfuel_domain::RetryConfig;
use thiserror::Error;
use tracing::warn;

use super::transport::TransportError;

/// Blocking sleep abstraction so tests can observe delays without waiting.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

/// Real sleeper backed by [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Backoff strategy for calculating retry delays
#[derive(Debug, Clone, PartialEq)]
pub enum BackoffStrategy {
    /// Fixed delay between retries
    Fixed(Duration),
    /// Exponential backoff: initial_delay * base^failure, capped at max_delay
    Exponential { initial_delay: Duration, base: f64, max_delay: Duration },
}

impl BackoffStrategy {
    /// Delay to wait after the `failure`-th consecutive failure (1-based).
    pub fn delay_after(&self, failure: u32) -> Duration {
        match self {
            BackoffStrategy::Fixed(delay) => *delay,
            BackoffStrategy::Exponential { initial_delay, base, max_delay } => {
                let exponent = i32::try_from(failure.saturating_sub(1)).unwrap_or(i32::MAX);
                let delay_ms = initial_delay.as_millis() as f64 * base.powi(exponent);
                let capped = delay_ms.min(max_delay.as_millis() as f64);
                Duration::from_millis(capped as u64)
            }
        }
    }
}

/// Attempt budget and backoff for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: BackoffStrategy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: BackoffStrategy::Fixed(Duration::from_millis(DEFAULT_RETRY_DELAY_MS)),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: BackoffStrategy) -> Self {
        Self { max_attempts: max_attempts.max(1), backoff }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        let backoff = if config.exponential {
            BackoffStrategy::Exponential {
                initial_delay: config.delay(),
                base: DEFAULT_BACKOFF_BASE,
                max_delay: Duration::from_millis(DEFAULT_MAX_BACKOFF_MS),
            }
        } else {
            BackoffStrategy::Fixed(config.delay())
        };
        Self::new(config.max_attempts, backoff)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff(&self) -> &BackoffStrategy {
        &self.backoff
    }

    /// Run `operation` until it produces a value, fails with a non-connection
    /// error, or exhausts the attempt budget.
    ///
    /// `operation` receives the 1-based attempt number.
    ///
    /// # Errors
    /// `RetryError::NonRetryable` for a request failure,
    /// `RetryError::AttemptsExhausted` when every attempt hit a connection
    /// failure.
    pub fn run<T, F>(&self, sleeper: &dyn Sleeper, mut operation: F) -> Result<T, RetryError>
    where
        F: FnMut(u32) -> Result<T, TransportError>,
    {
        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            match operation(attempt) {
                Ok(value) => return Ok(value),
                Err(TransportError::Connection(message)) => {
                    let delay = self.backoff.delay_after(attempt);
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %message,
                        "connection failure, backing off"
                    );
                    sleeper.sleep(delay);
                    last_error = message;
                }
                Err(err @ TransportError::Request(_)) => {
                    return Err(RetryError::NonRetryable { source: err });
                }
            }
        }

        Err(RetryError::AttemptsExhausted { attempts: self.max_attempts, last_error })
    }
}

/// Errors that can occur during retry operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryError {
    /// All retry attempts have been exhausted
    #[error("all {attempts} attempts failed to connect; last error: {last_error}")]
    AttemptsExhausted { attempts: u32, last_error: String },

    /// The operation failed with a non-retryable error
    #[error("non-retryable transport error: {source}")]
    NonRetryable { source: TransportError },
}

impl fmt::Display for BackoffStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(delay) => write!(f, "fixed({delay:?})"),
            Self::Exponential { initial_delay, base, max_delay } => {
                write!(f, "exponential({initial_delay:?} x{base}, max {max_delay:?})")
            }
        }
    }
}
