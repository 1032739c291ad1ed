//! Error classification for external-service failures
//!
//! What this module provides (spec)
//! - A classifier seam turning opaque provider errors into a retry decision
//!
//! Exports
//! - Models
//!   - `ErrorClass { Quota, RateLimited, Other }`
//! - Traits
//!   - `ErrorClassifier: fn classify(&BoxError) -> ErrorClass`
//! - Impls
//!   - `MessageClassifier`: case-insensitive keyword match on the rendered
//!     error message; Quota keywords take precedence over RateLimited ones
//!
//! Implementation strategy
//! - The external service surfaces failures only as human-readable messages,
//!   so classification is substring matching against fixed keyword lists.
//!   That is fragile by nature (wording changes break it); the trait keeps it
//!   swappable for a structured-error classifier without touching retry logic.

use serde::{Deserialize, Serialize};
use tower::BoxError;

/// Billing problems: waiting will not fix these, so they are never retried.
const QUOTA_KEYWORDS: &[&str] = &[
    "quota",
    "billing",
    "payment",
    "credit",
    "exceeded",
    "insufficient",
    "account",
    "plan",
    "subscription",
    "payment method",
];

/// Throttling: expected to clear, retried with backoff.
const RATE_LIMIT_KEYWORDS: &[&str] = &["429", "rate limit", "too many requests", "throttle"];

/// Coarse class of an external-service failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClass {
    /// Account/billing exhaustion; terminal
    Quota,
    /// Transient throttling; retryable
    RateLimited,
    /// Unknown transient fault; retryable
    Other,
}

impl ErrorClass {
    /// Whether a failure of this class is worth retrying.
    pub fn retryable(&self) -> bool {
        !matches!(self, ErrorClass::Quota)
    }
}

/// Classifier seam between the retry loop and provider errors.
pub trait ErrorClassifier: Send + Sync + 'static {
    fn classify(&self, error: &BoxError) -> ErrorClass;
}

/// Default classifier: keyword match on the error's `Display` output.
///
/// Quota is checked first. Messages like "429: quota exceeded for this
/// billing period" match both keyword sets, and retrying a billing failure
/// wastes the retry budget, so Quota wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageClassifier;

impl ErrorClassifier for MessageClassifier {
    fn classify(&self, error: &BoxError) -> ErrorClass {
        classify_message(&error.to_string())
    }
}

/// Pure, total classification of a rendered error message.
pub fn classify_message(message: &str) -> ErrorClass {
    let lower = message.to_lowercase();
    if QUOTA_KEYWORDS.iter().any(|k| lower.contains(k)) {
        ErrorClass::Quota
    } else if RATE_LIMIT_KEYWORDS.iter().any(|k| lower.contains(k)) {
        ErrorClass::RateLimited
    } else {
        ErrorClass::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_keywords_classify_as_quota() {
        for msg in [
            "insufficient quota",
            "Billing hard limit reached",
            "You exceeded your current plan",
            "no payment method on file",
        ] {
            assert_eq!(classify_message(msg), ErrorClass::Quota, "{msg}");
        }
    }

    #[test]
    fn rate_limit_keywords_classify_as_rate_limited() {
        for msg in [
            "429 Too Many Requests",
            "Rate limit reached for gpt-4o",
            "request was throttled",
        ] {
            assert_eq!(classify_message(msg), ErrorClass::RateLimited, "{msg}");
        }
    }

    #[test]
    fn quota_takes_precedence_when_both_match() {
        assert_eq!(
            classify_message("429: quota exceeded for this billing period"),
            ErrorClass::Quota
        );
    }

    #[test]
    fn unknown_messages_are_other() {
        assert_eq!(classify_message("connection reset by peer"), ErrorClass::Other);
        assert_eq!(classify_message(""), ErrorClass::Other);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify_message("INSUFFICIENT QUOTA"), ErrorClass::Quota);
        assert_eq!(classify_message("TOO MANY REQUESTS"), ErrorClass::RateLimited);
    }

    #[test]
    fn classifier_trait_renders_through_display() {
        let err: BoxError = "rate limit".into();
        assert_eq!(MessageClassifier.classify(&err), ErrorClass::RateLimited);
    }

    #[test]
    fn only_quota_is_non_retryable() {
        assert!(!ErrorClass::Quota.retryable());
        assert!(ErrorClass::RateLimited.retryable());
        assert!(ErrorClass::Other.retryable());
    }
}
