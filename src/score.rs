//! Confidence heuristic for generated titles
//!
//! Word overlap between the title and the source description, with a flat
//! bonus for model-generated titles and a penalty for generic ones. The
//! output is a bounded quality estimate, not a probability.

/// Titles containing these read as "we don't actually know the occupation".
const GENERIC_MARKERS: &[&str] = &["general", "worker", "разнорабоч", "работник"];

/// Score a generated title against its source description; result in [0, 1].
pub fn score(title: &str, description: &str) -> f32 {
    if title.trim().is_empty() || description.trim().is_empty() {
        return 0.0;
    }

    let description_lower = description.to_lowercase();
    let title_lower = title.to_lowercase();

    let words: Vec<&str> = title_lower
        .split_whitespace()
        .filter(|w| w.chars().count() > 2)
        .collect();
    let matched = words
        .iter()
        .filter(|w| description_lower.contains(*w))
        .count();
    let overlap = matched as f32 / words.len().max(1) as f32;

    // Flat bonus: an AI answer that made it this far passed the empty check.
    let mut confidence = overlap + 0.2;

    if GENERIC_MARKERS.iter().any(|m| title_lower.contains(m)) {
        confidence -= 0.3;
    }

    confidence.clamp(0.0, 1.0)
}
