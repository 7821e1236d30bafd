//! Heuristic issue detection for car-rental feedback.
//!
//! A fixed, non-learned taxonomy: each category carries one
//! case-insensitive pattern, and a review is tagged with every category
//! whose pattern matches anywhere in its text. Categories are independent;
//! overlapping matches are all reported, with no precedence between them.

use std::sync::LazyLock;

use regex::Regex;

/// Issue taxonomy: category name → detection pattern.
///
/// Matching is substring-based, not whole-word, so "clean" also fires on
/// "unclean" and on "Car was clean", alongside whatever else the text
/// matches.
const ISSUE_PATTERNS: &[(&str, &str)] = &[
    (
        "Service issue",
        r"(?i)(issue|problem|maintenance|break( |-)?down|engine|mechanic)",
    ),
    (
        "Cleanliness concern",
        r"(?i)(dirty|unclean|smell|odor|stain|clean)",
    ),
    (
        "Wait time issue",
        r"(?i)(slow|wait|delay|late|queue|pickup)",
    ),
    (
        "Staff attitude",
        r"(?i)(rude|unhelpful|impolite|staff|customer service)",
    ),
    (
        "Pricing complaint",
        r"(?i)(expensive|overpriced|costly|hidden fee|charge)",
    ),
    ("Fuel / mileage", r"(?i)(fuel|gas|mileage|petrol|diesel)"),
    ("Insurance / docs", r"(?i)(insurance|document|paperwork)"),
    ("GPS / tech", r"(?i)(gps|navigation|bluetooth|usb|carplay)"),
    ("Child seat", r"(?i)(child seat|baby seat|booster)"),
    ("Damage", r"(?i)(scratch|dent|damage)"),
];

static COMPILED: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    ISSUE_PATTERNS
        .iter()
        .map(|&(name, pattern)| (name, Regex::new(pattern).expect("valid issue pattern")))
        .collect()
});

/// Tags `text` with every matching issue category.
///
/// Pure function of the text and the static taxonomy: deterministic, no
/// side effects, and an empty or non-matching text yields an empty vec.
/// The result is duplicate-free and lexicographically sorted so downstream
/// display and reporting are stable.
#[must_use]
pub fn tag(text: &str) -> Vec<&'static str> {
    let mut matched: Vec<&'static str> = COMPILED
        .iter()
        .filter(|(_, pattern)| pattern.is_match(text))
        .map(|&(name, _)| name)
        .collect();
    matched.sort_unstable();
    matched
}

/// The configured taxonomy as `(category, pattern)` pairs, in declaration
/// order.
#[must_use]
pub fn categories() -> &'static [(&'static str, &'static str)] {
    ISSUE_PATTERNS
}
