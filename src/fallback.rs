//! Deterministic rule-based classifier
//!
//! What this module provides (spec)
//! - The guaranteed terminal fallback: maps a description to a canonical
//!   title by ordered keyword rules, never fails, never touches the network
//! - Description signal extraction used in every outcome's `analysis`
//!
//! Implementation strategy
//! - Lower-case the description once, walk the rule table, first match wins;
//!   a generic default covers everything else
//! - Keyword entries are stems, so they match across Russian case endings
//!   ("повар" matches "повара", "поваров")
//! - Location/salary patterns are lazily compiled regexes behind `OnceLock`

use std::sync::OnceLock;

use regex::Regex;

use crate::outcome::{ClassificationOutcome, DescriptionSignals, Method};

/// Confidence assigned to every rule-based title.
pub const FALLBACK_CONFIDENCE: f32 = 0.6;

/// Title used when no rule matches.
pub const DEFAULT_TITLE: &str = "Разнорабочий";

/// Ordered (keyword stems -> canonical title) rules; first match wins.
const RULES: &[(&[&str], &str)] = &[
    (&["повар", "кухн", "готовк"], "Повар"),
    (&["официант"], "Официант"),
    (&["бариста"], "Бариста"),
    (&["водител", "таксист", "перевозк"], "Водитель"),
    (&["курьер", "доставк", "доставщ"], "Курьер"),
    (&["продавец", "продавц", "кассир"], "Продавец"),
    (&["уборщ", "уборк", "клининг"], "Уборщик"),
    (&["грузчик", "погрузк", "разгрузк"], "Грузчик"),
    (&["строител", "стройк", "отделочн"], "Строитель"),
    (&["сварщик", "сварк"], "Сварщик"),
    (&["электрик", "электромонт"], "Электрик"),
    (&["сантехник"], "Сантехник"),
    (&["охранник", "сторож"], "Охранник"),
    (&["няня", "сиделк"], "Няня"),
    (&["парикмахер", "барбер"], "Парикмахер"),
    (&["швея", "швейн"], "Швея"),
    (&["бухгалтер"], "Бухгалтер"),
    (&["менеджер"], "Менеджер"),
];

const LANGUAGE_KEYWORDS: &[&str] = &[
    "английск",
    "русск",
    "немецк",
    "французск",
    "китайск",
    "казахск",
    "узбекск",
    "english",
    "язык",
];

const EXPERIENCE_KEYWORDS: &[&str] = &["опыт", "стаж", "experience", "лет работы"];

fn location_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // preposition + capitalized phrase: "в Москве", "at Riga"
        Regex::new(r"(?:^|\s)(?:[вВ]|[нН]а|[iI]n|[aA]t)\s+\p{Lu}\p{L}+").unwrap()
    })
}

fn salary_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\d[\d\s]*\s*(?:руб|₽|тенге|тг|грн|сом|usd|eur|euro|\$|€)").unwrap()
    })
}

/// Classify a description without the external service. Total: always
/// produces a titled outcome with fixed confidence.
pub fn classify(description: &str) -> ClassificationOutcome {
    let lower = description.to_lowercase();
    let title = RULES
        .iter()
        .find(|(stems, _)| stems.iter().any(|s| lower.contains(s)))
        .map(|(_, title)| *title)
        .unwrap_or(DEFAULT_TITLE);

    ClassificationOutcome {
        title: title.to_string(),
        confidence: FALLBACK_CONFIDENCE,
        method: Method::RuleBased,
        analysis: analyze(description),
    }
}

/// Derive the per-description signals; each predicate is independent.
pub fn analyze(description: &str) -> DescriptionSignals {
    let lower = description.to_lowercase();
    DescriptionSignals {
        has_specific_keywords: RULES
            .iter()
            .flat_map(|(stems, _)| stems.iter())
            .any(|s| lower.contains(s)),
        has_location: location_re().is_match(description),
        has_salary: salary_re().is_match(description),
        has_language_requirement: LANGUAGE_KEYWORDS.iter().any(|k| lower.contains(k)),
        has_experience_requirement: EXPERIENCE_KEYWORDS.iter().any(|k| lower.contains(k)),
    }
}
