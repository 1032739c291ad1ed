//! Title generation service
//!
//! The absorbing boundary of the crate: attempts the external model through
//! the rate-limited retry executor and degrades to the rule-based classifier
//! on every failure. Callers always get a usable outcome; the only thing
//! allowed to escape is cancellation.

use std::sync::Arc;
use std::sync::OnceLock;

use async_openai::Client;
use regex::Regex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::GeneratorConfig;
use crate::error::{Result, TitleError};
use crate::fallback;
use crate::outcome::{ClassificationOutcome, Method};
use crate::provider::{OpenAiProvider, TitleProvider, TitleRequest};
use crate::rate_limit::RateLimiter;
use crate::retry::Retrier;
use crate::score;

/// Optional context accompanying a description.
#[derive(Debug, Clone, Default)]
pub struct JobContext {
    pub location: Option<String>,
    pub salary: Option<u64>,
}

/// One generation with the failure it absorbed, if any. Batch statistics
/// are built from `absorbed`; callers that don't care use `outcome` alone.
#[derive(Debug)]
pub struct Generation {
    pub outcome: ClassificationOutcome,
    pub absorbed: Option<TitleError>,
}

/// Title generation service.
pub struct TitleGenerator {
    provider: Option<Arc<dyn TitleProvider>>,
    retrier: Retrier,
}

impl TitleGenerator {
    /// Build a generator over an explicit provider. `None` routes every
    /// request straight to the rule-based classifier.
    pub fn new(
        provider: Option<Arc<dyn TitleProvider>>,
        limiter: RateLimiter,
        config: GeneratorConfig,
    ) -> Self {
        Self {
            provider,
            retrier: Retrier::new(limiter, config.retry.clone()),
        }
    }

    /// Build a generator from the environment: with `OPENAI_API_KEY` set it
    /// talks to OpenAI, otherwise it runs rule-based only.
    pub fn from_env(limiter: RateLimiter, config: GeneratorConfig) -> Self {
        let provider: Option<Arc<dyn TitleProvider>> =
            if std::env::var("OPENAI_API_KEY").is_ok_and(|k| !k.is_empty()) {
                Some(Arc::new(OpenAiProvider::new(Client::new(), &config)))
            } else {
                None
            };
        Self::new(provider, limiter, config)
    }

    /// Generate a title. Total: every failure mode of the external call
    /// degrades to the rule-based classifier.
    pub async fn generate(&self, description: &str, ctx: &JobContext) -> ClassificationOutcome {
        match self.generate_until(description, ctx, None).await {
            Ok(generation) => generation.outcome,
            // Unreachable without a deadline; stay total regardless.
            Err(_) => fallback::classify(description),
        }
    }

    /// As [`generate`](Self::generate), but deadline-aware and reporting the
    /// absorbed failure. Only `Cancelled` escapes.
    pub async fn generate_until(
        &self,
        description: &str,
        ctx: &JobContext,
        deadline: Option<Instant>,
    ) -> Result<Generation> {
        let Some(provider) = self.provider.clone() else {
            debug!("no provider configured, classifying by rules");
            return Ok(Generation {
                outcome: fallback::classify(description),
                absorbed: None,
            });
        };

        let request = TitleRequest {
            description: description.to_string(),
            location: ctx.location.clone(),
            salary: ctx.salary,
            requirements: extract_requirements(description),
        };

        let attempt = self
            .retrier
            .execute(
                || {
                    let provider = provider.clone();
                    let request = request.clone();
                    async move { provider.complete(&request).await }
                },
                deadline,
            )
            .await
            .and_then(|text| {
                let title = clean_title(&text);
                if title.is_empty() {
                    Err(TitleError::EmptyCompletion)
                } else {
                    Ok(title)
                }
            });

        match attempt {
            Ok(title) => {
                let confidence = score::score(&title, description);
                Ok(Generation {
                    outcome: ClassificationOutcome {
                        title,
                        confidence,
                        method: Method::Ai,
                        analysis: fallback::analyze(description),
                    },
                    absorbed: None,
                })
            }
            Err(TitleError::Cancelled) => Err(TitleError::Cancelled),
            Err(err) => {
                warn!("generation failed ({err}), falling back to rules");
                Ok(Generation {
                    outcome: fallback::classify(description),
                    absorbed: Some(err),
                })
            }
        }
    }
}

/// Normalize a completion into a title: first line, trimmed, unquoted.
fn clean_title(text: &str) -> String {
    text.lines()
        .next()
        .unwrap_or("")
        .trim()
        .trim_matches(&['"', '\'', '«', '»', '.'][..])
        .trim()
        .to_string()
}

/// Best-effort scan for a requirement snippet: the clause following a
/// requirements marker, up to the end of the sentence. Empty when absent.
pub fn extract_requirements(description: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?i)(?:требования|обязательно|requirements?|required|mandatory)\s*[:\-]?\s*([^.\n!?]+)")
            .unwrap()
    });
    re.captures(description)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}
