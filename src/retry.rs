//! Retry mechanism with exponential backoff
//!
//! Wraps a single external call with rate-limited, classified retries:
//! admission first, then the call, then a backoff sleep on retryable
//! failures. Quota failures are billing problems that waiting cannot fix,
//! so they short-circuit after the first attempt.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tower::BoxError;
use tracing::{debug, warn};

use crate::classify::{ErrorClassifier, MessageClassifier};
use crate::config::RetryConfig;
use crate::error::{Result, TitleError};
use crate::rate_limit::RateLimiter;

/// Retry policy state for one execution
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
    attempt: usize,
    next_delay: Duration,
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new(config: RetryConfig) -> Self {
        Self {
            next_delay: config.initial_delay,
            config,
            attempt: 0,
        }
    }

    /// Check if we should retry
    pub fn should_retry(&self) -> bool {
        self.attempt < self.config.max_retries
    }

    /// Get the current attempt number
    pub fn attempt(&self) -> usize {
        self.attempt
    }

    /// Calculate next delay with exponential backoff
    pub fn next_delay(&mut self) -> Duration {
        let mut delay = self.next_delay;

        // Add jitter if enabled: multiply by 1 + r, r in [0, 0.3)
        if self.config.jitter {
            use rand::Rng;
            let mut rng = rand::thread_rng();
            let jitter = rng.gen_range(0.0..0.3);
            let jitter_ms = (delay.as_millis() as f64 * jitter) as u64;
            delay += Duration::from_millis(jitter_ms);
        }

        // Update for next iteration
        self.attempt += 1;
        self.next_delay = Duration::from_secs_f32(
            (self.next_delay.as_secs_f32() * self.config.backoff_multiplier)
                .min(self.config.max_delay.as_secs_f32()),
        );

        delay
    }

    /// Reset the retry policy
    pub fn reset(&mut self) {
        self.attempt = 0;
        self.next_delay = self.config.initial_delay;
    }
}

/// Rate-limited retry executor for external calls.
///
/// Holds the shared limiter handle, the retry configuration and the error
/// classifier; `execute` runs one logical call through all three.
#[derive(Debug, Clone)]
pub struct Retrier<C = MessageClassifier> {
    limiter: RateLimiter,
    config: RetryConfig,
    classifier: C,
}

impl Retrier<MessageClassifier> {
    pub fn new(limiter: RateLimiter, config: RetryConfig) -> Self {
        Self {
            limiter,
            config,
            classifier: MessageClassifier,
        }
    }
}

impl<C: ErrorClassifier> Retrier<C> {
    pub fn with_classifier(limiter: RateLimiter, config: RetryConfig, classifier: C) -> Self {
        Self {
            limiter,
            config,
            classifier,
        }
    }

    /// Run `op` until it succeeds, the retry budget is spent, a quota
    /// failure ends the attempt, or the deadline passes during a wait.
    pub async fn execute<F, Fut, T>(&self, mut op: F, deadline: Option<Instant>) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, BoxError>>,
    {
        let mut policy = RetryPolicy::new(self.config.clone());
        loop {
            self.limiter.admit_until(deadline).await?;

            match op().await {
                Ok(result) => {
                    if policy.attempt() > 0 {
                        debug!("call succeeded after {} attempts", policy.attempt() + 1);
                    }
                    return Ok(result);
                }
                Err(error) => {
                    let class = self.classifier.classify(&error);
                    let message = error.to_string();

                    if !class.retryable() {
                        debug!("non-retryable failure ({class:?}): {message}");
                        return Err(TitleError::from_classified(class, message));
                    }

                    if !policy.should_retry() {
                        let attempts = policy.attempt() + 1;
                        warn!(
                            "max retries ({}) exceeded, last error: {message}",
                            self.config.max_retries
                        );
                        return Err(TitleError::RetriesExhausted {
                            attempts,
                            class,
                            message,
                        });
                    }

                    let delay = policy.next_delay();
                    warn!(
                        "attempt {} failed ({class:?}): {message}, retrying in {delay:?}",
                        policy.attempt()
                    );
                    sleep_checked(delay, deadline).await?;
                }
            }
        }
    }
}

/// Sleep for `delay`, unless that would cross the deadline.
pub(crate) async fn sleep_checked(delay: Duration, deadline: Option<Instant>) -> Result<()> {
    if let Some(deadline) = deadline {
        if Instant::now() + delay >= deadline {
            return Err(TitleError::Cancelled);
        }
    }
    sleep(delay).await;
    Ok(())
}
