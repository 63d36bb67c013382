/*
[INPUT]:  Fallible async operation, attempt budget, fixed delay
[OUTPUT]: First success, or the last error unchanged
[POS]:    Resilience layer - bounded retry for transient failures
[UPDATE]: When retry timing or classification hooks change
*/

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_DELAY_MS: u64 = 1000;

/// Bounded retry with a fixed pause between attempts.
///
/// Holds no state across calls; every `run` starts with a fresh budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

/// One failed attempt, as seen inside the retry loop
#[derive(Debug)]
pub struct RetryAttempt<'a, E> {
    pub attempt: u32,
    pub error: &'a E,
    pub next_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_delay_ms() -> u64 {
    DEFAULT_DELAY_MS
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Single attempt, no waiting
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            delay_ms: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Effective budget; zero is treated as one attempt
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Run `operation`, retrying every failure
    pub async fn run<T, E, F, Fut>(&self, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.run_if(operation, |_| true).await
    }

    /// Run `operation`, retrying only failures `is_transient` accepts.
    ///
    /// Any other failure is returned immediately.
    pub async fn run_if<T, E, F, Fut, P>(&self, mut operation: F, is_transient: P) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: Display,
    {
        let max_attempts = self.attempts();
        let mut attempt = 1;

        loop {
            let error = match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(attempt, "operation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(error) => error,
            };

            if attempt >= max_attempts || !is_transient(&error) {
                return Err(error);
            }

            let record = RetryAttempt {
                attempt,
                error: &error,
                next_delay: self.delay(),
            };
            warn!(
                attempt = record.attempt,
                max_attempts,
                delay_ms = record.next_delay.as_millis() as u64,
                error = %record.error,
                "operation failed, retrying"
            );
            tokio::time::sleep(record.next_delay).await;
            attempt += 1;
        }
    }
}
