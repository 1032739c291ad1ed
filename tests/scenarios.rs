//! End-to-end scenarios for the classification client.
//!
//! Everything runs against a scripted provider; no network involved.

use std::sync::Arc;
use std::time::Duration;

use retitle::config::{BatchConfig, GeneratorConfig, RateLimitConfig, RetryConfig};
use retitle::{
    BatchDriver, BatchItem, JobContext, Method, RateLimiter, ScriptedProvider, TitleGenerator,
    TitleProvider,
};

fn limiter() -> RateLimiter {
    RateLimiter::new(RateLimitConfig {
        max_per_window: 1000,
        window: Duration::from_secs(60),
    })
}

fn config(max_retries: usize) -> GeneratorConfig {
    GeneratorConfig {
        retry: RetryConfig {
            max_retries,
            jitter: false,
            ..RetryConfig::default()
        },
        ..GeneratorConfig::default()
    }
}

fn generator(provider: Option<Arc<ScriptedProvider>>, max_retries: usize) -> TitleGenerator {
    TitleGenerator::new(
        provider.map(|p| p as Arc<dyn TitleProvider>),
        limiter(),
        config(max_retries),
    )
}

// Scenario A: no credential configured, known occupation keyword.
#[tokio::test]
async fn cook_description_without_credential_uses_rules() {
    let g = generator(None, 3);
    let outcome = g.generate("Ищем повара для кухни", &JobContext::default()).await;
    assert_eq!(outcome.title, "Повар");
    assert_eq!(outcome.method, Method::RuleBased);
    assert_eq!(outcome.confidence, 0.6);
}

// Scenario B: no rule matches, generic default title.
#[tokio::test]
async fn vague_description_gets_the_generic_title() {
    let g = generator(None, 3);
    let outcome = g
        .generate("Ищем работника для непонятной работы", &JobContext::default())
        .await;
    assert_eq!(outcome.title, "Разнорабочий");
    assert_eq!(outcome.method, Method::RuleBased);
}

// Scenario C: three throttles, then success, within the retry budget.
#[tokio::test(start_paused = true)]
async fn throttling_clears_within_the_retry_budget() {
    let p = ScriptedProvider::new(vec![
        Err("429 Too Many Requests".into()),
        Err("429 Too Many Requests".into()),
        Err("429 Too Many Requests".into()),
        Ok("Официант".into()),
    ]);
    let g = generator(Some(p.clone()), 3);
    let outcome = g.generate("Ищем официанта в кафе", &JobContext::default()).await;
    assert_eq!(outcome.title, "Официант");
    assert_eq!(outcome.method, Method::Ai);
    assert_eq!(p.calls(), 4);
}

// Scenario D: quota failure short-circuits; fallback matches scenario A.
#[tokio::test(start_paused = true)]
async fn quota_failure_falls_back_like_the_offline_path() {
    let p = ScriptedProvider::always_failing("insufficient quota");
    let g = generator(Some(p.clone()), 3);
    let outcome = g.generate("Ищем повара для кухни", &JobContext::default()).await;
    assert_eq!(outcome.title, "Повар");
    assert_eq!(outcome.method, Method::RuleBased);
    assert_eq!(outcome.confidence, 0.6);
    assert_eq!(p.calls(), 1, "quota must not be retried");
}

// Scenario E: one poisoned item degrades, the batch still completes.
#[tokio::test(start_paused = true)]
async fn poisoned_item_degrades_without_aborting_the_batch() {
    let p = ScriptedProvider::new(vec![
        Ok("Повар".into()),
        Ok("Водитель".into()),
        Err("connection reset by peer".into()),
        Err("connection reset by peer".into()),
        Ok("Продавец".into()),
        Ok("Грузчик".into()),
    ]);
    let generator = TitleGenerator::new(
        Some(p as Arc<dyn TitleProvider>),
        limiter(),
        config(1),
    );
    let driver = BatchDriver::new(generator, BatchConfig::default());

    let items: Vec<BatchItem> = [
        "кухня ресторана",
        "грузоперевозки",
        "непонятное занятие",
        "магазин продуктов",
        "склад",
    ]
    .iter()
    .map(|d| BatchItem {
        description: d.to_string(),
        ..Default::default()
    })
    .collect();

    let report = driver.run(&items).await.unwrap();
    assert_eq!(report.outcomes.len(), 5);
    assert!(report.stats.other_errors >= 1);
    assert_eq!(report.outcomes[2].method, Method::RuleBased);
    assert_eq!(report.stats.total, 5);
    assert_eq!(report.stats.success, 4);
}

// The absorbing boundary holds under every scripted failure mode.
#[tokio::test(start_paused = true)]
async fn generation_always_returns_an_outcome() {
    for failure in [
        "insufficient quota",
        "429 Too Many Requests",
        "connection reset",
        "request timed out",
        "",
    ] {
        let p = ScriptedProvider::always_failing(failure);
        let g = generator(Some(p), 1);
        for description in ["", "Ищем повара", "???"] {
            let outcome = g.generate(description, &JobContext::default()).await;
            assert!(!outcome.title.is_empty());
            assert_eq!(outcome.method, Method::RuleBased);
        }
    }
}
