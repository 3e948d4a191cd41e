//! Drug-name extraction from free-text (French) questions.
//!
//! Heuristic: the first token that follows one of the prepositions
//! `de`, `sur`, `concernant`, `pour`, `du`, `au`, `à propos de`. The token
//! is letters, digits, `-` and `_` only, so multi-word names yield their
//! first word and accented names are cut at the first accented letter.

use regex::Regex;

fn lazy_drug_name_regex() -> &'static Regex {
    use std::sync::OnceLock;
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:de|sur|concernant|pour|du|au|à propos de)\s+([A-Z0-9\-_]+)").unwrap()
    })
}

/// Uppercased drug name candidate, or `None` when the question has no
/// recognised prepositional cue.
pub fn extract_drug_name(question: &str) -> Option<String> {
    lazy_drug_name_regex()
        .captures(question)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_uppercase())
        .filter(|name| !name.is_empty())
}
