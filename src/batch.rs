//! Batch classification driver
//!
//! Sequentially titles a collection of postings with a coarse pacing pause
//! between items, on top of the limiter's own gating. One item's total
//! failure degrades to a rule-based outcome and is counted; it never aborts
//! the batch. Cancellation is the exception: it aborts the whole run.

use tokio::time::Instant;
use tracing::{debug, info};

use crate::classify::ErrorClass;
use crate::config::BatchConfig;
use crate::error::Result;
use crate::generate::{JobContext, TitleGenerator};
use crate::retry::sleep_checked;
use crate::outcome::{BatchStats, ClassificationOutcome, Method};

/// One unit of batch work: a description plus optional context fields.
#[derive(Debug, Clone, Default)]
pub struct BatchItem {
    pub description: String,
    pub location: Option<String>,
    pub salary: Option<u64>,
}

/// Everything a batch run produced: one outcome per input item, in order,
/// plus the aggregate counters.
#[derive(Debug)]
pub struct BatchReport {
    pub outcomes: Vec<ClassificationOutcome>,
    pub stats: BatchStats,
}

/// Sequential batch driver over a [`TitleGenerator`].
pub struct BatchDriver {
    generator: TitleGenerator,
    config: BatchConfig,
}

impl BatchDriver {
    pub fn new(generator: TitleGenerator, config: BatchConfig) -> Self {
        Self { generator, config }
    }

    /// Title every item. Only cancellation can fail the run.
    pub async fn run(&self, items: &[BatchItem]) -> Result<BatchReport> {
        self.run_until(items, None).await
    }

    /// As [`run`](Self::run), with a deadline covering the whole batch.
    pub async fn run_until(
        &self,
        items: &[BatchItem],
        deadline: Option<Instant>,
    ) -> Result<BatchReport> {
        let mut outcomes = Vec::with_capacity(items.len());
        let mut stats = BatchStats::default();

        for (i, item) in items.iter().enumerate() {
            let ctx = JobContext {
                location: item.location.clone(),
                salary: item.salary,
            };
            let generation = self
                .generator
                .generate_until(&item.description, &ctx, deadline)
                .await?;

            stats.total += 1;
            match generation.outcome.method {
                Method::Ai => stats.success += 1,
                Method::RuleBased => stats.fallback_used += 1,
            }
            if let Some(absorbed) = &generation.absorbed {
                match absorbed.class() {
                    ErrorClass::Quota => stats.quota_errors += 1,
                    ErrorClass::RateLimited => stats.rate_limit_errors += 1,
                    ErrorClass::Other => stats.other_errors += 1,
                }
                debug!(item = i, error = %absorbed, "item degraded to fallback");
            }
            outcomes.push(generation.outcome);

            if i + 1 < items.len() {
                sleep_checked(self.config.pacing, deadline).await?;
            }
        }

        info!(
            total = stats.total,
            success = stats.success,
            fallback = stats.fallback_used,
            "batch run finished"
        );
        Ok(BatchReport { outcomes, stats })
    }
}
