//! Property-style tests for the resilience pieces: the sliding-window
//! limiter bound, backoff shape, and scorer bounds.

use std::time::Duration;

use proptest::prelude::*;
use retitle::config::{RateLimitConfig, RetryConfig};
use retitle::{RateLimiter, RetryPolicy};
use tokio::time::Instant;

fn limiter(max: usize) -> RateLimiter {
    RateLimiter::new(RateLimitConfig {
        max_per_window: max,
        window: Duration::from_secs(60),
    })
}

/// The admission count inside any trailing 60s window never exceeds the
/// configured maximum, whatever the call pattern.
#[tokio::test(start_paused = true)]
async fn trailing_window_bound_holds_for_bursty_patterns() {
    let rl = limiter(4);
    let mut admissions: Vec<Instant> = Vec::new();

    // Burst, idle, burst: 12 admissions with uneven gaps between them
    for (i, gap_ms) in [0u64, 0, 0, 0, 100, 30_000, 0, 0, 5_000, 0, 45_000, 0]
        .iter()
        .enumerate()
    {
        tokio::time::advance(Duration::from_millis(*gap_ms)).await;
        rl.admit().await;
        admissions.push(Instant::now());

        let in_window = admissions
            .iter()
            .filter(|t| t.elapsed() < Duration::from_secs(60))
            .count();
        assert!(in_window <= 4, "admission {i}: {in_window} in window");
    }
}

#[tokio::test(start_paused = true)]
async fn concurrent_callers_share_one_window() {
    let rl = limiter(2);
    let start = Instant::now();

    let mut handles = Vec::new();
    for _ in 0..4 {
        let rl = rl.clone();
        handles.push(tokio::spawn(async move {
            rl.admit().await;
            Instant::now()
        }));
    }
    let mut times: Vec<Instant> = Vec::new();
    for h in handles {
        times.push(h.await.unwrap());
    }
    times.sort();

    // Two admitted immediately, two had to wait a full window
    assert_eq!(times[1].duration_since(start), Duration::ZERO);
    assert_eq!(times[2].duration_since(start), Duration::from_secs(60));
}

#[test]
fn backoff_grows_strictly_without_jitter() {
    let mut policy = RetryPolicy::new(RetryConfig {
        max_retries: 8,
        initial_delay: Duration::from_millis(50),
        max_delay: Duration::from_secs(3600),
        backoff_multiplier: 1.5,
        jitter: false,
    });
    let delays: Vec<_> = (0..8).map(|_| policy.next_delay()).collect();
    for pair in delays.windows(2) {
        assert!(pair[1] > pair[0], "{pair:?}");
    }
}

#[test]
fn jittered_backoff_stays_in_band() {
    // Each drawn delay lies in [base, base * 1.3)
    for _ in 0..200 {
        let mut reference = RetryPolicy::new(RetryConfig {
            max_retries: 5,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(60),
            backoff_multiplier: 2.0,
            jitter: false,
        });
        let mut jittered = RetryPolicy::new(RetryConfig {
            max_retries: 5,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(60),
            backoff_multiplier: 2.0,
            jitter: true,
        });
        for _ in 0..5 {
            let base = reference.next_delay();
            let drawn = jittered.next_delay();
            assert!(drawn >= base, "{drawn:?} < {base:?}");
            assert!(drawn < base.mul_f64(1.3), "{drawn:?} out of band for {base:?}");
        }
    }
}

proptest! {
    #[test]
    fn confidence_is_always_bounded(title in ".{0,64}", description in ".{0,256}") {
        let s = retitle::score::score(&title, &description);
        prop_assert!((0.0..=1.0).contains(&s), "{s}");
    }

    #[test]
    fn fallback_is_deterministic_and_titled(description in ".{0,256}") {
        let a = retitle::fallback::classify(&description);
        let b = retitle::fallback::classify(&description);
        prop_assert_eq!(&a, &b);
        prop_assert!(!a.title.is_empty());
        prop_assert_eq!(a.confidence, 0.6);
    }

    #[test]
    fn error_classification_is_total(message in ".{0,128}") {
        // Any message lands in exactly one class without panicking
        let _ = retitle::classify_message(&message);
    }
}
