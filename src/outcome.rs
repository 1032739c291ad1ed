//! Result model shared by the fallback classifier, the generator service and
//! the batch driver.

use serde::{Deserialize, Serialize};

/// How a title was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    /// The external model produced the title
    Ai,
    /// The deterministic keyword classifier produced it
    RuleBased,
}

/// Booleans derived purely from the description text; computed fresh on
/// every classification, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionSignals {
    pub has_specific_keywords: bool,
    pub has_location: bool,
    pub has_salary: bool,
    pub has_language_requirement: bool,
    pub has_experience_requirement: bool,
}

/// One classification result. Immutable once produced; persisting it is the
/// caller's business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationOutcome {
    pub title: String,
    /// Bounded plausibility estimate in [0, 1]; not a probability
    pub confidence: f32,
    pub method: Method,
    pub analysis: DescriptionSignals,
}

/// Running counters for one batch run; discarded when the run completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub total: usize,
    pub success: usize,
    pub fallback_used: usize,
    pub quota_errors: usize,
    pub rate_limit_errors: usize,
    pub other_errors: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_serializes_for_the_persistence_sink() {
        let outcome = ClassificationOutcome {
            title: "Повар".into(),
            confidence: 0.6,
            method: Method::RuleBased,
            analysis: DescriptionSignals::default(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["title"], "Повар");
        assert_eq!(json["method"], "RuleBased");
    }
}
