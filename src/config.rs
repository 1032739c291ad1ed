//! Configuration for the classification client
//!
//! Plain data with documented defaults; all of it is read-only after
//! construction.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retries (attempts beyond the first call)
    pub max_retries: usize,

    /// Initial retry delay
    pub initial_delay: Duration,

    /// Cap on the backoff delay
    pub max_delay: Duration,

    /// Exponential backoff multiplier; must be > 1 for growing delays
    pub backoff_multiplier: f32,

    /// Jitter to add randomness to retries
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum admissions within any trailing window
    pub max_per_window: usize,

    /// Length of the trailing window
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            // A deliberate fraction of the upstream 60 rpm allowance: one
            // limiter instance is shared between batch and interactive work.
            max_per_window: 15,
            window: Duration::from_secs(60),
        }
    }
}

/// Title generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Model to ask for the title
    pub model: String,

    /// Temperature for generation
    pub temperature: f32,

    /// Maximum tokens in the completion; titles are short
    pub max_tokens: u32,

    /// Retry configuration
    pub retry: RetryConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            max_tokens: 32,
            retry: RetryConfig::default(),
        }
    }
}

/// Batch processing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Pause between consecutive items, on top of rate-limiter gating
    pub pacing: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            pacing: Duration::from_millis(500),
        }
    }
}
