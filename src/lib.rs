//! # retitle
//!
//! Resilient job-title classification: turn a free-text job description into
//! a short canonical title using an external model, without ever letting the
//! model's availability break the caller.
//!
//! ## Core concepts
//!
//! - **Admission control**: a shared [`RateLimiter`] keeps external calls
//!   under a fixed count per trailing window
//! - **Classified retries**: a [`Retrier`] retries throttling and transient
//!   faults with exponential backoff and jitter, but fails fast on quota or
//!   billing errors that waiting cannot fix
//! - **Guaranteed fallback**: the deterministic [`fallback`] classifier
//!   produces a usable title whenever the external path is unavailable, so
//!   [`TitleGenerator::generate`] always returns an outcome
//! - **Batch driving**: [`BatchDriver`] titles whole collections with pacing
//!   and aggregate statistics, degrading per item instead of aborting
//!
//! ## Getting started
//!
//! Set `OPENAI_API_KEY` to enable the external model; without it every
//! request is classified by rules.
//!
//! ```rust,no_run
//! use retitle::{BatchDriver, BatchItem, RateLimiter, TitleGenerator};
//! use retitle::config::{BatchConfig, GeneratorConfig, RateLimitConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let limiter = RateLimiter::new(RateLimitConfig::default());
//! let generator = TitleGenerator::from_env(limiter, GeneratorConfig::default());
//!
//! let driver = BatchDriver::new(generator, BatchConfig::default());
//! let report = driver
//!     .run(&[BatchItem {
//!         description: "Ищем повара для кухни".into(),
//!         ..Default::default()
//!     }])
//!     .await?;
//!
//! println!("{} -> {}", report.stats.total, report.outcomes[0].title);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod classify;
pub mod config;
pub mod error;
pub mod fallback;
pub mod generate;
pub mod outcome;
pub mod provider;
pub mod rate_limit;
pub mod retry;
pub mod score;

pub use batch::{BatchDriver, BatchItem, BatchReport};
pub use classify::{classify_message, ErrorClass, ErrorClassifier, MessageClassifier};
pub use error::{Result, TitleError};
pub use generate::{Generation, JobContext, TitleGenerator};
pub use outcome::{BatchStats, ClassificationOutcome, DescriptionSignals, Method};
pub use provider::{OpenAiProvider, ScriptedProvider, TitleProvider, TitleRequest};
pub use rate_limit::RateLimiter;
pub use retry::{Retrier, RetryPolicy};

// Re-export the OpenAI client types callers need to construct a provider
pub use async_openai::{config::OpenAIConfig, Client};
