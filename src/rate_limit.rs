//! Sliding-window admission control
//!
//! What this module provides (spec)
//! - A shared gate that keeps calls to the external service under a fixed
//!   count per trailing window, suspending callers until a slot frees up
//!
//! Implementation strategy
//! - Keep admission timestamps in a `VecDeque<Instant>` behind an async
//!   mutex; prune, compare and record as one atomic unit under the lock
//! - When the window is full, sleep until the oldest admission ages out,
//!   then re-check; the lock is never held across a sleep
//! - The handle clones cheaply (`Arc` inside) so one limiter instance can
//!   gate every caller in the process — construction is explicit, there is
//!   no hidden singleton

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::config::RateLimitConfig;
use crate::error::{Result, TitleError};

/// Clone-able handle to a shared sliding-window rate limiter.
#[derive(Clone)]
pub struct RateLimiter {
    window: Duration,
    max_per_window: usize,
    admissions: Arc<Mutex<VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            window: config.window,
            max_per_window: config.max_per_window.max(1),
            admissions: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Wait until a slot is free, then record the admission.
    pub async fn admit(&self) {
        // Cannot fail without a deadline.
        let _ = self.admit_until(None).await;
    }

    /// As [`admit`](Self::admit), but gives up with `Cancelled` if the wait
    /// would cross `deadline`.
    pub async fn admit_until(&self, deadline: Option<Instant>) -> Result<()> {
        loop {
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    return Err(TitleError::Cancelled);
                }
            }

            let wait = {
                let mut admissions = self.admissions.lock().await;
                let now = Instant::now();
                while admissions
                    .front()
                    .is_some_and(|t| now.duration_since(*t) >= self.window)
                {
                    admissions.pop_front();
                }
                if admissions.len() < self.max_per_window {
                    admissions.push_back(now);
                    return Ok(());
                }
                // Full: the oldest entry leaving the window frees the slot.
                let oldest = *admissions.front().unwrap();
                self.window - now.duration_since(oldest)
            };

            debug!(wait_ms = wait.as_millis() as u64, "rate limiter full, waiting");
            if let Some(deadline) = deadline {
                if Instant::now() + wait >= deadline {
                    return Err(TitleError::Cancelled);
                }
            }
            sleep(wait).await;
        }
    }

    /// Admissions currently inside the trailing window.
    pub async fn in_flight(&self) -> usize {
        let mut admissions = self.admissions.lock().await;
        let now = Instant::now();
        while admissions
            .front()
            .is_some_and(|t| now.duration_since(*t) >= self.window)
        {
            admissions.pop_front();
        }
        admissions.len()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("window", &self.window)
            .field("max_per_window", &self.max_per_window)
            .finish()
    }
}
